use std::sync::Arc;

use crate::application::dashboards::DashboardService;
use crate::application::definitions::ReportDefinitionService;
use crate::application::repos::StoreHealthRepo;

#[derive(Clone)]
pub struct ApiState {
    pub definitions: Arc<ReportDefinitionService>,
    pub dashboards: Arc<DashboardService>,
    pub store_health: Arc<dyn StoreHealthRepo>,
}
