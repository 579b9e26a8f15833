mod common;

use common::TestContext;
use travel_agency_backend::model::user::Role;
use travel_agency_backend::service::user_service::UserService;
use travel_agency_backend::util::error::ServiceError;
use travel_agency_backend::util::jwt::JwtTokenUtils;

#[tokio::test]
async fn test_register_normalizes_email_and_issues_tokens() {
    let ctx = TestContext::new();
    let res = ctx
        .user_service
        .register("Jane Traveler".to_string(), "  Jane@Example.COM ".to_string(), "secret123".to_string())
        .await
        .unwrap();

    assert_eq!(res.user.email, "jane@example.com");
    assert_eq!(res.user.role, Role::User);
    assert_eq!(res.user.id.len(), 24);
    assert_eq!(res.tokens.token_type, "Bearer");

    let claims = ctx.jwt_utils.validate_access_token(&res.tokens.access_token).unwrap();
    assert_eq!(claims.sub, res.user.id);
    assert_eq!(claims.role, "user");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let ctx = TestContext::new();
    ctx.user_service
        .register("Jane".to_string(), "jane@example.com".to_string(), "secret123".to_string())
        .await
        .unwrap();
    let again = ctx
        .user_service
        .register("Other Jane".to_string(), "JANE@example.com".to_string(), "secret456".to_string())
        .await;
    assert!(matches!(again, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_uniformly() {
    let ctx = TestContext::new();
    ctx.traveler("jane@example.com").await;

    let wrong_password = ctx.user_service.login("jane@example.com".to_string(), "nope".to_string()).await;
    let unknown_user = ctx.user_service.login("ghost@example.com".to_string(), "user123".to_string()).await;
    assert_eq!(wrong_password.unwrap_err(), ServiceError::Unauthorized("Invalid credentials".to_string()));
    assert_eq!(unknown_user.unwrap_err(), ServiceError::Unauthorized("Invalid credentials".to_string()));

    let ok = ctx.user_service.login(" Jane@Example.com".to_string(), "user123".to_string()).await.unwrap();
    assert_eq!(ok.user.name, "John Doe");
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let ctx = TestContext::new();
    ctx.traveler("jane@example.com").await;
    let login = ctx.user_service.login("jane@example.com".to_string(), "user123".to_string()).await.unwrap();

    let refreshed = ctx.user_service.refresh_token(login.tokens.refresh_token.clone()).await.unwrap();
    assert!(ctx.jwt_utils.validate_access_token(&refreshed.access_token).is_ok());

    // Access tokens are not accepted for refreshing
    let wrong_kind = ctx.user_service.refresh_token(login.tokens.access_token).await;
    assert!(matches!(wrong_kind, Err(ServiceError::Unauthorized(_))));
}

#[tokio::test]
async fn test_authenticate_uses_stored_role() {
    let ctx = TestContext::new();
    let user = ctx.traveler("jane@example.com").await;
    let token = ctx.access_token(&user);

    ctx.users.set_role(&user.id, Role::Admin);
    let resolved = ctx.user_service.authenticate(&token).await.unwrap();
    assert_eq!(resolved.id, user.id);
    assert!(resolved.is_admin());
}

#[tokio::test]
async fn test_authenticate_rejects_deleted_user_and_refresh_tokens() {
    let ctx = TestContext::new();
    let user = ctx.traveler("jane@example.com").await;
    let pair = ctx
        .jwt_utils
        .generate_token_pair(&user.id.to_hex(), &user.email, user.role.as_str())
        .unwrap();

    assert!(matches!(
        ctx.user_service.authenticate(&pair.refresh_token).await,
        Err(ServiceError::Unauthorized(_))
    ));

    ctx.users.remove(&user.id);
    assert!(matches!(
        ctx.user_service.authenticate(&pair.access_token).await,
        Err(ServiceError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_ensure_admin_is_idempotent() {
    let ctx = TestContext::new();
    let first = ctx
        .user_service
        .ensure_admin("Admin User".to_string(), "admin@travelagency.com".to_string(), "admin123".to_string())
        .await
        .unwrap();
    let second = ctx
        .user_service
        .ensure_admin("Admin User".to_string(), "admin@travelagency.com".to_string(), "admin123".to_string())
        .await
        .unwrap();

    assert_eq!(first.role, Role::Admin);
    assert_eq!(first.id, second.id);
}
