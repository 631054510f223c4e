/*
 * Responsibility
 * - controller group (API バージョン単位) を prefix 付きでまとめ、ルートテーブルを作る
 */
use axum::Router;

use crate::state::AppState;

pub mod v1;

/// Route table built from controller groups mounted under a prefix.
#[derive(Default)]
pub struct RouteTable {
    router: Router<AppState>,
    groups: Vec<&'static str>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(mut self, prefix: &'static str, group: Router<AppState>) -> Self {
        self.router = self.router.nest(prefix, group);
        self.groups.push(prefix);
        self
    }

    pub fn groups(&self) -> &[&'static str] {
        &self.groups
    }

    pub fn into_router(self) -> Router<AppState> {
        self.router
    }
}

/// The application's route table.
pub fn routes() -> RouteTable {
    RouteTable::new().add_group("/api/v1", v1::routes())
}
