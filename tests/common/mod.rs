#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use bson::oid::ObjectId;
use serde_json::Value;
use tower::ServiceExt; // for .oneshot()

use travel_agency_backend::config::JwtConfig;
use travel_agency_backend::middlewares::auth_middleware::AuthState;
use travel_agency_backend::model::booking::{Booking, BookingStatus};
use travel_agency_backend::model::package::{NewPackage, Package, PackageChanges};
use travel_agency_backend::model::timestamp;
use travel_agency_backend::model::user::{AuthenticatedUser, Role, User};
use travel_agency_backend::repository::booking_repo::BookingRepository;
use travel_agency_backend::repository::package_repo::PackageRepository;
use travel_agency_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use travel_agency_backend::repository::user_repo::UserRepository;
use travel_agency_backend::router::api_router;
use travel_agency_backend::service::booking_service::BookingServiceImpl;
use travel_agency_backend::service::package_service::PackageServiceImpl;
use travel_agency_backend::service::user_service::UserServiceImpl;
use travel_agency_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use travel_agency_backend::util::password::{PasswordUtils, PasswordUtilsImpl};

// --- In-memory repositories ---

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::already_exists("Duplicate key: email"));
        }
        user.id = Some(ObjectId::new());
        let now = timestamp();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }
}

impl InMemoryUserRepository {
    pub fn remove(&self, id: &ObjectId) {
        self.users.lock().unwrap().retain(|u| u.id.as_ref() != Some(id));
    }

    pub fn set_role(&self, id: &ObjectId, role: Role) {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id.as_ref() == Some(id)) {
            user.role = role;
        }
    }
}

/// Kept in insertion order; listings walk it backwards for newest-first.
#[derive(Default)]
pub struct InMemoryPackageRepository {
    packages: Mutex<Vec<Package>>,
}

#[async_trait]
impl PackageRepository for InMemoryPackageRepository {
    async fn insert(&self, mut package: Package) -> RepositoryResult<Package> {
        package.id = Some(ObjectId::new());
        let now = timestamp();
        package.created_at = Some(now.clone());
        package.updated_at = Some(now);
        self.packages.lock().unwrap().push(package.clone());
        Ok(package)
    }

    async fn list(&self) -> RepositoryResult<Vec<Package>> {
        Ok(self.packages.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Package>> {
        Ok(self.packages.lock().unwrap().iter().find(|p| p.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Package>> {
        Ok(self
            .packages
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.id.map_or(false, |id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn apply_changes(&self, id: &ObjectId, changes: &PackageChanges) -> RepositoryResult<Option<Package>> {
        let mut packages = self.packages.lock().unwrap();
        Ok(packages.iter_mut().find(|p| p.id.as_ref() == Some(id)).map(|package| {
            changes.apply_to(package);
            package.updated_at = Some(timestamp());
            package.clone()
        }))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let mut packages = self.packages.lock().unwrap();
        let before = packages.len();
        packages.retain(|p| p.id.as_ref() != Some(id));
        Ok(packages.len() < before)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.packages.lock().unwrap().len() as u64)
    }
}

impl InMemoryPackageRepository {
    pub fn all_titles(&self) -> Vec<String> {
        self.packages.lock().unwrap().iter().map(|p| p.title.clone()).collect()
    }
}

/// Check and insert happen under one lock, mirroring the unique partial index.
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: Mutex<Vec<Booking>>,
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert_active(&self, mut booking: Booking) -> RepositoryResult<Booking> {
        let mut bookings = self.bookings.lock().unwrap();
        let taken = bookings.iter().any(|b| {
            b.user_id == booking.user_id && b.package_id == booking.package_id && b.status.is_active()
        });
        if taken {
            return Err(RepositoryError::already_exists("You have already booked this package"));
        }
        booking.id = Some(ObjectId::new());
        let now = timestamp();
        booking.created_at = Some(now.clone());
        booking.updated_at = Some(now);
        bookings.push(booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Booking>> {
        Ok(self.bookings.lock().unwrap().iter().find(|b| b.id.as_ref() == Some(id)).cloned())
    }

    async fn list_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|b| &b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn compare_and_set_status(
        &self,
        id: &ObjectId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> RepositoryResult<Option<Booking>> {
        let mut bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter_mut()
            .find(|b| b.id.as_ref() == Some(id) && b.status == expected)
            .map(|booking| {
                booking.status = next;
                booking.updated_at = Some(timestamp());
                booking.clone()
            }))
    }

    async fn cancel_active_for_package(&self, package_id: &ObjectId) -> RepositoryResult<u64> {
        let mut cancelled = 0;
        for booking in self.bookings.lock().unwrap().iter_mut() {
            if &booking.package_id == package_id && booking.status.is_active() {
                booking.status = BookingStatus::Cancelled;
                booking.updated_at = Some(timestamp());
                cancelled += 1;
            }
        }
        Ok(cancelled)
    }
}

impl InMemoryBookingRepository {
    pub fn all(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().clone()
    }

    /// Simulates another request changing the status behind the service's back.
    pub fn force_status(&self, id: &ObjectId, status: BookingStatus) {
        if let Some(booking) = self.bookings.lock().unwrap().iter_mut().find(|b| b.id.as_ref() == Some(id)) {
            booking.status = status;
        }
    }
}

// --- Wiring ---

pub struct TestContext {
    pub users: Arc<InMemoryUserRepository>,
    pub packages: Arc<InMemoryPackageRepository>,
    pub bookings: Arc<InMemoryBookingRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_service: Arc<UserServiceImpl>,
    pub package_service: Arc<PackageServiceImpl>,
    pub booking_service: Arc<BookingServiceImpl>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let packages = Arc::new(InMemoryPackageRepository::default());
        let bookings = Arc::new(InMemoryBookingRepository::default());
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default()));
        let user_service = Arc::new(UserServiceImpl::new(users.clone(), jwt_utils.clone()));
        let package_service = Arc::new(PackageServiceImpl::new(packages.clone(), bookings.clone()));
        let booking_service = Arc::new(BookingServiceImpl::new(bookings.clone(), packages.clone()));
        TestContext { users, packages, bookings, jwt_utils, user_service, package_service, booking_service }
    }

    pub fn router(&self) -> Router {
        let auth_state = Arc::new(AuthState::new(self.jwt_utils.clone(), self.user_service.clone()));
        api_router(
            self.user_service.clone(),
            self.package_service.clone(),
            self.booking_service.clone(),
            auth_state,
        )
    }

    /// Stores a user directly, bypassing registration so any role can be created.
    pub async fn create_user(&self, name: &str, email: &str, password: &str, role: Role) -> AuthenticatedUser {
        let user = User {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: PasswordUtilsImpl::hash_password(password).unwrap(),
            role,
            created_at: None,
            updated_at: None,
        };
        let stored = self.users.insert(user).await.unwrap();
        AuthenticatedUser::from_user(&stored).unwrap()
    }

    pub async fn admin(&self) -> AuthenticatedUser {
        self.create_user("Admin User", "admin@travelagency.com", "admin123", Role::Admin).await
    }

    pub async fn traveler(&self, email: &str) -> AuthenticatedUser {
        self.create_user("John Doe", email, "user123", Role::User).await
    }

    pub fn access_token(&self, user: &AuthenticatedUser) -> String {
        self.jwt_utils
            .generate_access_token(&user.id.to_hex(), &user.email, user.role.as_str())
            .unwrap()
    }

    pub async fn seed_package(&self, owner: &AuthenticatedUser, title: &str, price: f64) -> Package {
        self.packages.insert(new_package(title, price).into_package(owner.id)).await.unwrap()
    }
}

pub fn new_package(title: &str, price: f64) -> NewPackage {
    NewPackage {
        title: title.to_string(),
        location: "Bali, Indonesia".to_string(),
        price,
        description: "Temples, rice terraces and beaches".to_string(),
        image: "https://images.example.com/bali.jpg".to_string(),
    }
}

// --- HTTP helpers ---

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}
