use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use bson::oid::ObjectId;
use tracing::{error, info, warn};

use crate::app::seed::seed_sample_packages;
use crate::config::{AdminUserConfig, AppConfig, JwtConfig, MongoConfig};
use crate::middlewares::auth_middleware::AuthState;
use crate::repository::booking_repo::MongoBookingRepository;
use crate::repository::mongo_client;
use crate::repository::package_repo::{MongoPackageRepository, PackageRepository};
use crate::repository::user_repo::MongoUserRepository;
use crate::router::api_router;
use crate::service::booking_service::BookingServiceImpl;
use crate::service::package_service::PackageServiceImpl;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::jwt::JwtTokenUtilsImpl;

pub type AppError = Box<dyn Error + Send + Sync>;

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    /// Loads configuration, connects to MongoDB, prepares indexes and the bootstrap data,
    /// and wires every router.
    pub async fn new() -> Result<Self, AppError> {
        let config = AppConfig::from_env()?;
        let jwt_config = JwtConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;

        let db = mongo_client::connect(&mongo_config).await?;
        let user_repo = Arc::new(MongoUserRepository::new(&db, &mongo_config.users_collection));
        let package_repo = Arc::new(MongoPackageRepository::new(&db, &mongo_config.packages_collection));
        let booking_repo = Arc::new(MongoBookingRepository::new(&db, &mongo_config.bookings_collection));

        user_repo.ensure_indexes().await?;
        booking_repo.ensure_indexes().await?;

        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let user_service = Arc::new(UserServiceImpl::new(user_repo, jwt_utils.clone()));
        let package_service = Arc::new(PackageServiceImpl::new(package_repo.clone(), booking_repo.clone()));
        let booking_service = Arc::new(BookingServiceImpl::new(booking_repo, package_repo.clone()));

        let admin_id = Self::create_first_admin_user(&user_service).await;
        if config.seed_sample_packages {
            Self::seed_catalogue(package_repo.as_ref(), admin_id).await;
        }

        let auth_state = Arc::new(AuthState::new(jwt_utils, user_service.clone()));
        let router = api_router(user_service, package_service, booking_service, auth_state)
            .route("/health", get(|| async { "OK" }));

        Ok(App { config, router })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn start(self) -> Result<(), AppError> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🚀 Server running at http://{}", addr);
        axum::serve(listener, self.router).await?;
        Ok(())
    }

    async fn create_first_admin_user(user_service: &UserServiceImpl) -> Option<ObjectId> {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return None;
            }
        };
        match user_service
            .ensure_admin(admin_conf.name, admin_conf.email, admin_conf.password)
            .await
        {
            Ok(admin) => admin.id,
            Err(e) => {
                error!("Failed to create admin user: {e}");
                None
            }
        }
    }

    async fn seed_catalogue(package_repo: &dyn PackageRepository, admin_id: Option<ObjectId>) {
        let Some(owner) = admin_id else {
            warn!("No admin account available, sample packages not seeded");
            return;
        };
        if let Err(e) = seed_sample_packages(package_repo, owner).await {
            error!("Failed to seed sample packages: {e}");
        }
    }
}
