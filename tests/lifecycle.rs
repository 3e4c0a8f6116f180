use allo_controller::controller::MethodSet;
use allo_controller::prelude::*;
use allo_controller::Lifecycle;
use axum::body::Body;
use std::sync::Mutex;

#[derive(Default)]
struct AuditLog(Mutex<Vec<String>>);

impl AuditLog {
    fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct Clock(u64);

#[controller(name = "Dashboard")]
struct DashboardPage {
    ctx: ControllerContext,
    audit: Option<Arc<AuditLog>>,
    clock: Option<Arc<Clock>>,
    visits: u32,
}

#[lifecycle]
impl DashboardPage {
    async fn inject_audit_log(&mut self, audit: Arc<AuditLog>) {
        self.audit = Some(audit);
    }

    fn inject_clock(&mut self, clock: Arc<Clock>) -> Result<()> {
        self.clock = Some(clock);
        Ok(())
    }

    async fn startup(&mut self) {
        self.visits += 1;
        self.note("startup");
    }

    fn action_weekly_report(&mut self, params: &Params) -> anyhow::Result<()> {
        let week = params.get("week").map(String::as_str).unwrap_or("0");
        let week: u32 = week.parse()?;
        self.note(&format!("weeklyReport {week}"));
        Ok(())
    }

    async fn render_weekly_report(&mut self) -> Result<Flow> {
        let now = self.clock.as_ref().map_or(0, |clock| clock.0);
        self.send_text(format!("report at {now} after {} visit", self.visits))
    }

    fn shutdown(&mut self) {
        self.note("shutdown");
    }

    fn note(&self, entry: &str) {
        if let Some(audit) = &self.audit {
            audit.record(entry);
        }
    }
}

fn manager(audit: &Arc<AuditLog>) -> ControllerManager {
    let mut manager = ControllerManager::default();
    manager
        .register::<DashboardPage>()
        .unwrap()
        .add_shared_dependency("auditLog", Arc::clone(audit))
        .unwrap()
        .add_dependency("clock", Clock(1_700))
        .unwrap();
    manager
}

fn request() -> HttpRequest {
    HttpRequest::new(Body::empty())
}

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn runs_sync_and_async_methods_in_order() {
    let audit = Arc::new(AuditLog::default());
    let response = manager(&audit)
        .create_response("Dashboard:weeklyReport", request(), params(&[("week", "12")]))
        .await
        .unwrap();

    assert_eq!(response.body_text(), Some("report at 1700 after 1 visit"));
    assert_eq!(
        audit.entries(),
        vec!["startup", "weeklyReport 12", "shutdown"]
    );
}

#[tokio::test]
async fn user_errors_propagate_unchanged() {
    let audit = Arc::new(AuditLog::default());
    let err = manager(&audit)
        .create_response("Dashboard:weeklyReport", request(), params(&[("week", "soon")]))
        .await
        .err()
        .unwrap();

    match err {
        ControllerError::Handler(inner) => {
            assert!(inner.downcast_ref::<std::num::ParseIntError>().is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(audit.entries(), vec!["startup", "shutdown"]);
}

#[tokio::test]
async fn each_request_gets_a_fresh_instance() {
    let audit = Arc::new(AuditLog::default());
    let manager = manager(&audit);

    for _ in 0..3 {
        let response = manager
            .create_response("Dashboard:weeklyReport", request(), Params::new())
            .await
            .unwrap();
        assert_eq!(response.body_text(), Some("report at 1700 after 1 visit"));
    }
}

#[tokio::test]
async fn missing_dependency_is_reported_by_name() {
    let mut manager = ControllerManager::default();
    manager.register::<DashboardPage>().unwrap();
    manager.add_dependency("auditLog", AuditLog::default()).unwrap();

    let err = manager
        .create_response("Dashboard:weeklyReport", request(), Params::new())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ControllerError::DependencyNotFound { ref name } if name == "clock"));
}

#[tokio::test]
async fn orchestrator_can_be_driven_directly() {
    let audit = Arc::new(AuditLog::default());
    let container = ContainerBuilder::new()
        .register_arc("auditLog", Arc::clone(&audit))
        .register("clock", Clock(5))
        .build()
        .unwrap();

    let mut page = DashboardPage::instantiate(request(), "weeklyReport", Params::new());
    let response = Lifecycle::new(&container).dispatch(&mut page).await.unwrap();

    assert_eq!(response.body_text(), Some("report at 5 after 1 visit"));
    assert_eq!(page.http_response().and_then(|r| r.body_text()), Some("report at 5 after 1 visit"));
}

#[test]
fn method_names_follow_the_convention() {
    let shape = MethodSet::<DashboardPage>::shared().shape();

    assert_eq!(shape.hooks, vec!["startup", "shutdown"]);
    assert_eq!(shape.inject, vec!["auditLog".to_string(), "clock".to_string()]);
    assert!(shape.action.contains("weeklyReport"));
    assert!(shape.render.contains("weeklyReport"));
    assert_eq!(DashboardPage::NAME, "Dashboard");
}
