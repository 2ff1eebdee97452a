use crate::{
    abstract_trait::{
        auth::DynAuthService,
        dashboard::DynDashboardService,
        events::DynChangeFeed,
        product::{
            repository::{DynProductCommandRepository, DynProductQueryRepository},
            service::{DynProductCommandService, DynProductQueryService},
        },
        refresh_token::DynRefreshTokenRepository,
        staff::{DynStaffRepository, DynStaffService},
        user::DynUserRepository,
        withdrawal::{
            repository::{DynWithdrawalCommandRepository, DynWithdrawalQueryRepository},
            service::{DynWithdrawalCommandService, DynWithdrawalQueryService},
        },
    },
    repository::{
        product::{command::ProductCommandRepository, query::ProductQueryRepository},
        refresh_token::RefreshTokenRepository,
        staff::StaffRepository,
        user::UserRepository,
        withdrawal::{command::WithdrawalCommandRepository, query::WithdrawalQueryRepository},
    },
    service::{
        auth::{AuthService, AuthServiceDeps},
        dashboard::DashboardService,
        product::{ProductCommandService, ProductCommandServiceDeps, ProductQueryService},
        staff::StaffService,
        withdrawal::{
            WithdrawalCommandService, WithdrawalCommandServiceDeps, WithdrawalQueryService,
        },
    },
};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynHashing, DynJwtService, DynRateLimitMiddleware, DynSessionMiddleware},
    cache::CacheStore,
    config::ConnectionPool,
};
use std::{fmt, sync::Arc};

/// Every storage seam the services depend on.
#[derive(Clone)]
pub struct Repositories {
    pub user: DynUserRepository,
    pub refresh_token: DynRefreshTokenRepository,
    pub staff: DynStaffRepository,
    pub product_query: DynProductQueryRepository,
    pub product_command: DynProductCommandRepository,
    pub withdrawal_query: DynWithdrawalQueryRepository,
    pub withdrawal_command: DynWithdrawalCommandRepository,
}

impl Repositories {
    pub fn postgres(pool: ConnectionPool) -> Self {
        Self {
            user: Arc::new(UserRepository::new(pool.clone())),
            refresh_token: Arc::new(RefreshTokenRepository::new(pool.clone())),
            staff: Arc::new(StaffRepository::new(pool.clone())),
            product_query: Arc::new(ProductQueryRepository::new(pool.clone())),
            product_command: Arc::new(ProductCommandRepository::new(pool.clone())),
            withdrawal_query: Arc::new(WithdrawalQueryRepository::new(pool.clone())),
            withdrawal_command: Arc::new(WithdrawalCommandRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub repositories: Repositories,
    pub cache_store: Arc<CacheStore>,
    pub change_feed: DynChangeFeed,
    pub hashing: DynHashing,
    pub jwt: DynJwtService,
    pub session: DynSessionMiddleware,
    pub rate_limit: DynRateLimitMiddleware,
}

#[derive(Clone)]
pub struct DependenciesInject {
    pub auth_service: DynAuthService,
    pub staff_service: DynStaffService,
    pub product_query: DynProductQueryService,
    pub product_command: DynProductCommandService,
    pub withdrawal_query: DynWithdrawalQueryService,
    pub withdrawal_command: DynWithdrawalCommandService,
    pub dashboard: DynDashboardService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("auth_service", &"AuthService")
            .field("staff_service", &"StaffService")
            .field("product_query", &"ProductQueryService")
            .field("product_command", &"ProductCommandService")
            .field("withdrawal_query", &"WithdrawalQueryService")
            .field("withdrawal_command", &"WithdrawalCommandService")
            .field("dashboard", &"DashboardService")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps {
            repositories,
            cache_store,
            change_feed,
            hashing,
            jwt,
            session,
            rate_limit,
        } = deps;

        let auth_service: DynAuthService = Arc::new(AuthService::new(
            AuthServiceDeps {
                user_repository: repositories.user.clone(),
                refresh_token_repository: repositories.refresh_token.clone(),
                hashing,
                jwt,
                session,
                attempt_counter: rate_limit,
            },
            registry,
        ));

        let staff_service: DynStaffService =
            Arc::new(StaffService::new(repositories.staff.clone(), registry));

        let product_query: DynProductQueryService = Arc::new(ProductQueryService::new(
            repositories.product_query.clone(),
            cache_store.clone(),
            registry,
        ));

        let product_command: DynProductCommandService = Arc::new(ProductCommandService::new(
            ProductCommandServiceDeps {
                query: repositories.product_query.clone(),
                command: repositories.product_command.clone(),
                cache_store: cache_store.clone(),
                change_feed: change_feed.clone(),
            },
            registry,
        ));

        let withdrawal_query: DynWithdrawalQueryService = Arc::new(WithdrawalQueryService::new(
            repositories.withdrawal_query.clone(),
            registry,
        ));

        let withdrawal_command: DynWithdrawalCommandService =
            Arc::new(WithdrawalCommandService::new(
                WithdrawalCommandServiceDeps {
                    staff: repositories.staff.clone(),
                    command: repositories.withdrawal_command.clone(),
                    cache_store,
                    change_feed,
                },
                registry,
            ));

        let dashboard: DynDashboardService = Arc::new(DashboardService::new(
            product_query.clone(),
            withdrawal_query.clone(),
        ));

        Self {
            auth_service,
            staff_service,
            product_query,
            product_command,
            withdrawal_query,
            withdrawal_command,
            dashboard,
        }
    }
}
