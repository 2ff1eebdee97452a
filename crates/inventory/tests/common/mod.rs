#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use http_body_util::BodyExt;
use inventory::{
    abstract_trait::{
        auth::AuthServiceTrait,
        product::repository::{ProductCommandRepositoryTrait, ProductQueryRepositoryTrait},
        refresh_token::RefreshTokenRepositoryTrait,
        staff::StaffRepositoryTrait,
        user::UserRepositoryTrait,
        withdrawal::repository::{
            WithdrawalCommandRepositoryTrait, WithdrawalQueryRepositoryTrait,
        },
    },
    di::Repositories,
    domain::{
        requests::{product::FindAllProducts, withdrawal::FindWithdrawalHistory},
        response::pagination::Pagination,
        status::{ProductStatus, StatusFilter},
    },
    events::BroadcastChangeFeed,
    handler::AppRouter,
    model::{
        product::Product, refresh_token::RefreshToken, staff::Staff, user::User,
        withdrawal::{WithdrawalHistory, WithdrawalLine, WithdrawalOutcome},
    },
    state::{AppState, AppStateParts},
};
use serde_json::Value;
use shared::{
    abstract_trait::{HashingTrait, JwtServiceTrait, RateLimitMiddlewareTrait, SessionMiddlewareTrait},
    cache::{CacheStore, Session},
    config::{Hashing, JwtConfig, RedisPool},
    errors::RepositoryError,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-secret";
pub const ADMIN_EMAIL: &str = "owner@studio.test";
pub const ADMIN_PASSWORD: &str = "correct-horse";

#[derive(Clone)]
struct ItemRow {
    id: i32,
    withdrawal_id: i32,
    product_id: Option<i32>,
    product_name: String,
    quantity: i32,
}

#[derive(Clone)]
struct WithdrawalRow {
    id: i32,
    staff_id: i32,
    created_at: NaiveDateTime,
}

#[derive(Default)]
struct Data {
    next_id: i32,
    users: Vec<User>,
    refresh_tokens: Vec<RefreshToken>,
    staff: Vec<Staff>,
    products: Vec<Product>,
    withdrawals: Vec<WithdrawalRow>,
    items: Vec<ItemRow>,
    clock: i64,
}

impl Data {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps so ordering by time is deterministic.
    fn now(&mut self) -> NaiveDateTime {
        self.clock += 1;
        DateTime::from_timestamp(1_750_000_000 + self.clock, 0)
            .unwrap()
            .naive_utc()
    }

    fn history(&self) -> Vec<WithdrawalHistory> {
        let mut rows: Vec<WithdrawalHistory> = self
            .items
            .iter()
            .filter_map(|item| {
                let withdrawal = self.withdrawals.iter().find(|w| w.id == item.withdrawal_id)?;
                let staff = self.staff.iter().find(|s| s.id == withdrawal.staff_id)?;
                let product = item
                    .product_id
                    .and_then(|id| self.products.iter().find(|p| p.id == id));

                Some(WithdrawalHistory {
                    withdrawal_id: withdrawal.id,
                    created_at: withdrawal.created_at,
                    staff_id: staff.id,
                    staff_name: staff.name.clone(),
                    item_id: item.id,
                    product_id: item.product_id,
                    product_name: product
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| item.product_name.clone()),
                    product_status: product.map(|p| p.status.clone()),
                    quantity: item.quantity,
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.item_id.cmp(&a.item_id))
        });
        rows
    }

    fn filtered_products(&self, search: &str, status: StatusFilter) -> Vec<Product> {
        let needle = search.trim().to_lowercase();
        let mut products: Vec<Product> = self
            .products
            .iter()
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .filter(|p| match status.as_status() {
                Some(wanted) => ProductStatus::from_quantity(p.quantity) == wanted,
                None => true,
            })
            .cloned()
            .collect();

        products.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        products
    }
}

/// In-memory stand-in for PostgreSQL implementing every repository trait.
#[derive(Default)]
pub struct MemoryDb {
    data: Mutex<Data>,
}

impl MemoryDb {
    pub fn product(&self, id: i32) -> Option<Product> {
        self.data
            .lock()
            .unwrap()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn withdrawal_count(&self) -> usize {
        self.data.lock().unwrap().withdrawals.len()
    }

    pub fn refresh_token_count(&self, user_id: i32) -> usize {
        self.data
            .lock()
            .unwrap()
            .refresh_tokens
            .iter()
            .filter(|t| t.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl UserRepositoryTrait for MemoryDb {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        let data = self.data.lock().unwrap();
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, RepositoryError> {
        let mut data = self.data.lock().unwrap();
        if data.users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(RepositoryError::AlreadyExists(email.to_string()));
        }

        let now = data.now();
        let user = User {
            id: data.next_id(),
            email: email.to_string(),
            password: hashed_password.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        data.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl RefreshTokenRepositoryTrait for MemoryDb {
    async fn create(
        &self,
        user_id: i32,
        token: &str,
        expiration: NaiveDateTime,
    ) -> Result<RefreshToken, RepositoryError> {
        let mut data = self.data.lock().unwrap();
        let now = data.now();
        let row = RefreshToken {
            refresh_token_id: data.next_id(),
            user_id,
            token: token.to_string(),
            expiration,
            created_at: Some(now),
        };
        data.refresh_tokens.push(row.clone());
        Ok(row)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, RepositoryError> {
        let data = self.data.lock().unwrap();
        Ok(data.refresh_tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn delete_token(&self, token: &str) -> Result<(), RepositoryError> {
        let mut data = self.data.lock().unwrap();
        let before = data.refresh_tokens.len();
        data.refresh_tokens.retain(|t| t.token != token);
        if data.refresh_tokens.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: i32) -> Result<(), RepositoryError> {
        let mut data = self.data.lock().unwrap();
        data.refresh_tokens.retain(|t| t.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl StaffRepositoryTrait for MemoryDb {
    async fn find_all(&self) -> Result<Vec<Staff>, RepositoryError> {
        let data = self.data.lock().unwrap();
        let mut staff = data.staff.clone();
        staff.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(staff)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Staff>, RepositoryError> {
        let data = self.data.lock().unwrap();
        Ok(data.staff.iter().find(|s| s.id == id).cloned())
    }

    async fn create(&self, name: &str) -> Result<Staff, RepositoryError> {
        let mut data = self.data.lock().unwrap();
        let now = data.now();
        let staff = Staff {
            id: data.next_id(),
            name: name.to_string(),
            created_at: Some(now),
        };
        data.staff.push(staff.clone());
        Ok(staff)
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for MemoryDb {
    async fn find_all(&self, req: &FindAllProducts) -> Result<(Vec<Product>, i64), RepositoryError> {
        let data = self.data.lock().unwrap();
        let all = data.filtered_products(&req.search, req.status);
        let window_count = all.len() as i64;
        // Same shape as COUNT(*) OVER(): the count rides on returned rows only.
        let rows: Vec<(Product, i64)> = all
            .into_iter()
            .map(|p| (p, window_count))
            .skip(Pagination::offset(req.page, req.page_size) as usize)
            .take(req.page_size as usize)
            .collect();
        let total = match rows.first() {
            Some((_, count)) => *count,
            None if req.page > 1 => data.filtered_products(&req.search, req.status).len() as i64,
            None => 0,
        };
        Ok((rows.into_iter().map(|(p, _)| p).collect(), total))
    }

    async fn find_filtered(
        &self,
        search: &str,
        status: StatusFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.data.lock().unwrap().filtered_products(search, status))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, RepositoryError> {
        Ok(self.product(id))
    }

    async fn find_by_name(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<Option<Product>, RepositoryError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .products
            .iter()
            .find(|p| p.name.to_lowercase() == name.to_lowercase() && Some(p.id) != exclude_id)
            .cloned())
    }

    async fn find_low_stock(&self) -> Result<Vec<Product>, RepositoryError> {
        let data = self.data.lock().unwrap();
        let mut products: Vec<Product> = data
            .products
            .iter()
            .filter(|p| p.quantity <= 3)
            .cloned()
            .collect();
        products.sort_by(|a, b| {
            a.quantity
                .cmp(&b.quantity)
                .then(a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(products)
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for MemoryDb {
    async fn create_product(
        &self,
        name: &str,
        quantity: i32,
        status: ProductStatus,
    ) -> Result<Product, RepositoryError> {
        let mut data = self.data.lock().unwrap();
        if data
            .products
            .iter()
            .any(|p| p.name.to_lowercase() == name.to_lowercase())
        {
            return Err(RepositoryError::AlreadyExists("products_name_lower_key".into()));
        }

        let now = data.now();
        let product = Product {
            id: data.next_id(),
            name: name.to_string(),
            quantity,
            status: status.as_str().to_string(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        data.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        name: &str,
        quantity: i32,
        status: ProductStatus,
    ) -> Result<Product, RepositoryError> {
        let mut data = self.data.lock().unwrap();
        let now = data.now();
        let product = data
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        product.name = name.to_string();
        product.quantity = quantity;
        product.status = status.as_str().to_string();
        product.updated_at = Some(now);
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        let deleted = self.delete_products(&[id]).await?;
        if deleted.is_empty() {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_products(&self, ids: &[i32]) -> Result<Vec<i32>, RepositoryError> {
        let mut data = self.data.lock().unwrap();
        let deleted: Vec<i32> = data
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| p.id)
            .collect();

        data.products.retain(|p| !ids.contains(&p.id));
        for item in data.items.iter_mut() {
            if item.product_id.is_some_and(|id| deleted.contains(&id)) {
                item.product_id = None;
            }
        }
        Ok(deleted)
    }
}

#[async_trait]
impl WithdrawalQueryRepositoryTrait for MemoryDb {
    async fn find_history(
        &self,
        req: &FindWithdrawalHistory,
    ) -> Result<(Vec<WithdrawalHistory>, i64), RepositoryError> {
        let data = self.data.lock().unwrap();
        let rows: Vec<WithdrawalHistory> = data
            .history()
            .into_iter()
            .filter(|r| req.staff_id.is_none_or(|id| r.staff_id == id))
            .collect();
        let window_count = rows.len() as i64;
        let page: Vec<(WithdrawalHistory, i64)> = rows
            .into_iter()
            .map(|r| (r, window_count))
            .skip(Pagination::offset(req.page, req.page_size) as usize)
            .take(req.page_size as usize)
            .collect();
        let total = match page.first() {
            Some((_, count)) => *count,
            None if req.page > 1 => data
                .history()
                .iter()
                .filter(|r| req.staff_id.is_none_or(|id| r.staff_id == id))
                .count() as i64,
            None => 0,
        };
        Ok((page.into_iter().map(|(r, _)| r).collect(), total))
    }

    async fn find_recent(&self, limit: i64) -> Result<Vec<WithdrawalHistory>, RepositoryError> {
        let data = self.data.lock().unwrap();
        Ok(data.history().into_iter().take(limit as usize).collect())
    }

    async fn find_for_export(
        &self,
        staff_id: Option<i32>,
    ) -> Result<Vec<WithdrawalHistory>, RepositoryError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .history()
            .into_iter()
            .filter(|r| staff_id.is_none_or(|id| r.staff_id == id))
            .collect())
    }
}

#[async_trait]
impl WithdrawalCommandRepositoryTrait for MemoryDb {
    async fn create_withdrawal(
        &self,
        staff_id: i32,
        lines: &[WithdrawalLine],
    ) -> Result<WithdrawalOutcome, RepositoryError> {
        let mut data = self.data.lock().unwrap();

        for line in lines {
            let product = data
                .products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or(RepositoryError::NotFound)?;
            if product.quantity < line.quantity {
                return Err(RepositoryError::Conflict(format!(
                    "Insufficient stock for {}: requested {}, available {}",
                    product.name, line.quantity, product.quantity
                )));
            }
        }

        let created_at = data.now();
        let withdrawal_id = data.next_id();
        data.withdrawals.push(WithdrawalRow {
            id: withdrawal_id,
            staff_id,
            created_at,
        });

        let mut products = Vec::new();
        for line in lines {
            let item_id = data.next_id();
            let product = data
                .products
                .iter_mut()
                .find(|p| p.id == line.product_id)
                .ok_or(RepositoryError::NotFound)?;

            product.quantity -= line.quantity;
            product.status = ProductStatus::from_quantity(product.quantity)
                .as_str()
                .to_string();
            product.updated_at = Some(created_at);
            let snapshot = product.clone();

            data.items.push(ItemRow {
                id: item_id,
                withdrawal_id,
                product_id: Some(snapshot.id),
                product_name: snapshot.name.clone(),
                quantity: line.quantity,
            });
            products.push(snapshot);
        }

        let mut rows: Vec<WithdrawalHistory> = data
            .history()
            .into_iter()
            .filter(|r| r.withdrawal_id == withdrawal_id)
            .collect();
        rows.sort_by_key(|r| r.item_id);

        Ok(WithdrawalOutcome {
            withdrawal_id,
            rows,
            products,
        })
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn contains(&self, key: &str) -> bool {
        self.sessions.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl SessionMiddlewareTrait for MemorySessionStore {
    async fn create_session(&self, session_id: &str, session: &Session, _ttl: Duration) -> bool {
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.to_string(), session.clone());
        true
    }

    async fn get_session(&self, session_id: &str) -> Option<Session> {
        self.sessions.lock().unwrap().get(session_id).cloned()
    }

    async fn delete_session(&self, session_id: &str) -> bool {
        self.sessions.lock().unwrap().remove(session_id).is_some()
    }

    async fn refresh_session(&self, session_id: &str, _ttl: Duration) -> bool {
        self.contains(session_id)
    }
}

pub struct MemoryRateLimiter {
    max_override: Option<u32>,
    hits: Mutex<HashMap<String, u32>>,
}

impl MemoryRateLimiter {
    pub fn new(max_override: Option<u32>) -> Self {
        Self {
            max_override,
            hits: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RateLimitMiddlewareTrait for MemoryRateLimiter {
    async fn check_rate_limit(&self, key: &str, max_requests: u32, _window: u32) -> (bool, u32) {
        let mut hits = self.hits.lock().unwrap();
        let count = hits.entry(key.to_string()).or_insert(0);
        *count += 1;
        let max = self.max_override.unwrap_or(max_requests);
        (*count <= max, *count)
    }

    async fn current_count(&self, key: &str) -> u32 {
        self.hits.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    async fn reset_limit(&self, key: &str) -> bool {
        self.hits.lock().unwrap().remove(key).is_some()
    }
}

/// Redis pool pointing at a closed port: every cache call degrades to a miss.
pub fn unreachable_cache() -> Arc<CacheStore> {
    let redis = RedisPool::from_url("redis://127.0.0.1:1/0").expect("pool config");
    Arc::new(CacheStore::new(redis.pool))
}

pub struct TestApp {
    pub db: Arc<MemoryDb>,
    pub sessions: Arc<MemorySessionStore>,
    pub feed: Arc<BroadcastChangeFeed>,
    pub jwt: Arc<JwtConfig>,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_rate_limit(None).await
    }

    pub async fn with_rate_limit(max_requests: Option<u32>) -> Self {
        let db = Arc::new(MemoryDb::default());
        let sessions = Arc::new(MemorySessionStore::default());
        let feed = Arc::new(BroadcastChangeFeed::default());
        let jwt = Arc::new(JwtConfig::new(JWT_SECRET));

        let repositories = Repositories {
            user: db.clone(),
            refresh_token: db.clone(),
            staff: db.clone(),
            product_query: db.clone(),
            product_command: db.clone(),
            withdrawal_query: db.clone(),
            withdrawal_command: db.clone(),
        };

        let state = AppState::from_parts(AppStateParts {
            repositories,
            cache_store: unreachable_cache(),
            hashing: Arc::new(Hashing::new()),
            jwt: jwt.clone(),
            session: sessions.clone(),
            rate_limit: Arc::new(MemoryRateLimiter::new(max_requests)),
            change_feed: feed.clone(),
        });

        state
            .di_container
            .auth_service
            .ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("admin bootstrap");

        Self {
            db,
            sessions,
            feed,
            jwt,
            state,
        }
    }

    pub fn router(&self) -> Router {
        AppRouter::build(self.state.clone())
    }

    pub async fn seed_staff(&self, name: &str) -> Staff {
        StaffRepositoryTrait::create(self.db.as_ref(), name).await.unwrap()
    }

    pub async fn seed_product(&self, name: &str, quantity: i32) -> Product {
        self.db
            .create_product(name, quantity, ProductStatus::from_quantity(quantity))
            .await
            .unwrap()
    }

    /// Logs in through the service and returns an access token.
    pub async fn access_token(&self) -> String {
        self.state
            .di_container
            .auth_service
            .login(&inventory::domain::requests::auth::LoginRequest {
                email: ADMIN_EMAIL.into(),
                password: ADMIN_PASSWORD.into(),
            })
            .await
            .unwrap()
            .data
            .access_token
    }

    pub fn token_for(&self, user_id: i32) -> String {
        self.jwt.generate_token(user_id, "access").unwrap()
    }

    pub async fn hash(&self, password: &str) -> String {
        Hashing::new().hash_password(password).await.unwrap()
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
