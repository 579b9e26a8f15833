mod common;

use common::{new_package, TestContext};
use travel_agency_backend::model::booking::BookingStatus;
use travel_agency_backend::model::package::PackageChanges;
use travel_agency_backend::service::booking_service::BookingService;
use travel_agency_backend::service::package_service::PackageService;
use travel_agency_backend::util::error::ServiceError;

#[tokio::test]
async fn test_create_then_get_returns_same_fields() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;

    let fields = new_package("Bali Paradise", 1299.0);
    let created = ctx.package_service.create_package(fields.clone(), &admin).await.unwrap();
    let id = created.id.expect("server assigned id");
    let fetched = ctx.package_service.get_package(&id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.title, fields.title);
    assert_eq!(fetched.location, fields.location);
    assert_eq!(fetched.price, fields.price);
    assert_eq!(fetched.description, fields.description);
    assert_eq!(fetched.image, fields.image);
    assert_eq!(fetched.created_by, admin.id);
    assert!(fetched.created_at.is_some());
    assert!(fetched.updated_at.is_some());
}

#[tokio::test]
async fn test_non_admin_cannot_mutate() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let user = ctx.traveler("jane@example.com").await;
    let package = ctx.seed_package(&admin, "Tokyo Urban Experience", 1899.0).await;
    let id = package.id.unwrap();

    let create = ctx.package_service.create_package(new_package("Nope", 1.0), &user).await;
    assert!(matches!(create, Err(ServiceError::Forbidden(_))));

    let changes = PackageChanges { price: Some(1.0), ..Default::default() };
    let update = ctx.package_service.update_package(&id, changes, &user).await;
    assert!(matches!(update, Err(ServiceError::Forbidden(_))));

    let delete = ctx.package_service.delete_package(&id, &user).await;
    assert!(matches!(delete, Err(ServiceError::Forbidden(_))));

    assert_eq!(ctx.package_service.get_package(&id).await.unwrap(), package);
}

#[tokio::test]
async fn test_update_price_keeps_other_fields() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let before = ctx.seed_package(&admin, "Bali Paradise", 1299.0).await;
    let id = before.id.unwrap();

    let changes = PackageChanges { price: Some(500.0), ..Default::default() };
    let after = ctx.package_service.update_package(&id, changes, &admin).await.unwrap();

    assert_eq!(after.price, 500.0);
    assert_eq!(after.title, before.title);
    assert_eq!(after.location, before.location);
    assert_eq!(after.description, before.description);
    assert_eq!(after.image, before.image);
    assert_eq!(after.created_by, before.created_by);
}

#[tokio::test]
async fn test_update_applies_zero_price_and_empty_image() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let id = ctx.seed_package(&admin, "Bali Paradise", 1299.0).await.id.unwrap();

    let changes = PackageChanges { price: Some(0.0), image: Some(String::new()), ..Default::default() };
    let after = ctx.package_service.update_package(&id, changes, &admin).await.unwrap();
    assert_eq!(after.price, 0.0);
    assert!(after.image.is_empty());
}

#[tokio::test]
async fn test_invalid_fields_are_rejected() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;

    let negative = ctx.package_service.create_package(new_package("Cheap", -1.0), &admin).await;
    assert!(matches!(negative, Err(ServiceError::InvalidInput(_))));

    let blank = new_package("   ", 10.0);
    let blank = ctx.package_service.create_package(blank, &admin).await;
    assert!(matches!(blank, Err(ServiceError::InvalidInput(_))));

    let id = ctx.seed_package(&admin, "Bali Paradise", 1299.0).await.id.unwrap();
    let changes = PackageChanges { price: Some(f64::NAN), ..Default::default() };
    let update = ctx.package_service.update_package(&id, changes, &admin).await;
    assert!(matches!(update, Err(ServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn test_missing_package_is_not_found() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let missing = bson::oid::ObjectId::new();

    assert!(matches!(ctx.package_service.get_package(&missing).await, Err(ServiceError::NotFound(_))));
    let update = ctx.package_service.update_package(&missing, PackageChanges::default(), &admin).await;
    assert!(matches!(update, Err(ServiceError::NotFound(_))));
    assert!(matches!(
        ctx.package_service.delete_package(&missing, &admin).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    ctx.seed_package(&admin, "First", 1.0).await;
    ctx.seed_package(&admin, "Second", 2.0).await;
    ctx.seed_package(&admin, "Third", 3.0).await;

    let titles: Vec<String> = ctx.package_service.list_packages().await.unwrap().into_iter().map(|p| p.title).collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn test_delete_cancels_active_bookings() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let alice = ctx.traveler("alice@example.com").await;
    let bob = ctx.traveler("bob@example.com").await;
    let id = ctx.seed_package(&admin, "Santorini Sunset Getaway", 1699.0).await.id.unwrap();

    ctx.booking_service.create_booking(&alice, &id).await.unwrap();
    let bobs = ctx.booking_service.create_booking(&bob, &id).await.unwrap();
    let bobs_id = bobs.booking.id.unwrap();
    ctx.booking_service.update_booking_status(&bobs_id, BookingStatus::Confirmed, &admin).await.unwrap();

    ctx.package_service.delete_package(&id, &admin).await.unwrap();

    assert!(matches!(ctx.package_service.get_package(&id).await, Err(ServiceError::NotFound(_))));
    assert!(ctx.bookings.all().iter().all(|b| b.status == BookingStatus::Cancelled));

    let history = ctx.booking_service.list_user_bookings(&alice).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].package.is_none());
}

#[tokio::test]
async fn test_empty_update_writes_nothing() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let before = ctx.seed_package(&admin, "Swiss Alps Adventure", 2499.0).await;
    let id = before.id.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let after = ctx.package_service.update_package(&id, PackageChanges::default(), &admin).await.unwrap();
    assert_eq!(after, before);
    assert_eq!(after.updated_at, before.updated_at);

    let missing = bson::oid::ObjectId::new();
    let res = ctx.package_service.update_package(&missing, PackageChanges::default(), &admin).await;
    assert_eq!(res.unwrap_err(), ServiceError::NotFound("Package not found".to_string()));
}
