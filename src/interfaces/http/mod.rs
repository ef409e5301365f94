use crate::application::{AnalysisRun, AnalysisRunUseCase, NarrationUseCase, ReportAggregator, UploadUseCase};
use crate::domain::error::AppError;
use crate::domain::robustness::{DisplayEntry, RobustnessReport, RobustnessResult};
use crate::domain::session::{normalize_target, AnalysisSession};
use crate::infrastructure::activity_log::ActivityLog;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::ColumnInferencer;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::python_runner::{AnalysisExecutor, RunOutcome};
use crate::infrastructure::storage;
use actix_cors::Cors;
use actix_files::Files;
use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm, MultipartFormConfig};
use actix_web::{delete, dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};


const SOURCE: &str = "HttpApi";
const RESULTS_NOT_FOUND: &str = "Analysis results not found. Please run analysis first.";
const ASK_BUDDY_FAILED: &str = "AI explanation unavailable. Please try again.";

pub struct HttpState {
    pub config: AppConfig,
    pub upload: UploadUseCase,
    pub analysis: AnalysisRunUseCase,
    pub narration: NarrationUseCase,
    pub llm_client: Arc<dyn LLMClient + Send + Sync>,
    pub sessions: Mutex<HashMap<String, AnalysisSession>>,
    pub logs: ActivityLog,
}

impl HttpState {
    pub fn new(
        config: AppConfig,
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        executor: Arc<dyn AnalysisExecutor + Send + Sync>,
        logs: ActivityLog,
    ) -> Self {
        let upload = UploadUseCase::new(
            ColumnInferencer::new(config.inference.dialect),
            config.paths.upload_dir.clone(),
        );
        let analysis = AnalysisRunUseCase::new(executor, config.paths.result_file.clone());
        let narration = NarrationUseCase::new(llm_client.clone(), config.narration.clone());

        Self {
            config,
            upload,
            analysis,
            narration,
            llm_client,
            sessions: Mutex::new(HashMap::new()),
            logs,
        }
    }

    fn session(&self, id: &str) -> Option<AnalysisSession> {
        let sessions = self.sessions.lock().unwrap_or_else(|p| p.into_inner());
        sessions.get(id).cloned()
    }

    /// Adds a session, evicting the oldest ones (and their uploads) beyond
    /// `server.max_sessions`. The session being added is never evicted.
    async fn register_session(&self, session: AnalysisSession) {
        let evicted = {
            let mut sessions = self.sessions.lock().unwrap_or_else(|p| p.into_inner());
            let keep = session.id.clone();
            sessions.insert(keep.clone(), session);

            let mut evicted = Vec::new();
            while sessions.len() > self.config.server.max_sessions {
                let oldest = sessions
                    .values()
                    .filter(|s| s.id != keep)
                    .min_by_key(|s| s.created_at)
                    .map(|s| s.id.clone());
                match oldest.and_then(|id| sessions.remove(&id)) {
                    Some(session) => evicted.push(session),
                    None => break,
                }
            }
            evicted
        };

        for session in evicted {
            self.logs.info(
                SOURCE,
                &format!("Evicting session {} ({})", session.id, session.file_name),
            );
            if let Err(e) = self.upload.discard(&session).await {
                self.logs.warn(
                    SOURCE,
                    &format!("Failed to delete upload for session {}: {}", session.id, e),
                );
            }
        }
    }

    /// Writes back a session after a run. A session removed meanwhile
    /// stays removed; returns whether the write happened.
    fn update_session(&self, session: AnalysisSession) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(|p| p.into_inner());
        match sessions.get_mut(&session.id) {
            Some(slot) => {
                *slot = session;
                true
            }
            None => false,
        }
    }

    fn remove_session(&self, id: &str) -> Option<AnalysisSession> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|p| p.into_inner());
        sessions.remove(id)
    }

    fn chart_url(&self) -> String {
        format!(
            "/output/{}?t={}",
            self.config.paths.chart_file,
            Utc::now().timestamp_millis()
        )
    }
}

#[derive(MultipartForm)]
pub struct RunTestForm {
    pub csv: Option<Bytes>,
    pub target: Option<Text<String>>,
}

#[derive(MultipartForm)]
pub struct ColumnsForm {
    pub csv: Option<Bytes>,
}

#[derive(Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsResponse {
    pub session_id: String,
    pub file_name: String,
    pub columns: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub entries: Vec<DisplayEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_url: Option<String>,
}

impl ReportResponse {
    fn build(state: &HttpState, session_id: Option<String>, result: &RobustnessResult) -> Self {
        let report = ReportAggregator::aggregate(result);
        let entries = report.entries();

        match &report {
            RobustnessReport::Error { reason } => {
                state
                    .logs
                    .warn(SOURCE, &format!("Report shows failed analysis: {}", reason));
                Self {
                    session_id,
                    status: "error",
                    reason: Some(reason.clone()),
                    target: None,
                    entries,
                    chart_url: None,
                }
            }
            RobustnessReport::Success { target, .. } => {
                let labels: Vec<String> = report
                    .status_labels()
                    .iter()
                    .map(|label| format!("{} {}", label.glyph(), label))
                    .collect();
                state
                    .logs
                    .info(SOURCE, &format!("Report ready: {}", labels.join(", ")));
                Self {
                    session_id,
                    status: "success",
                    reason: None,
                    target: target.clone(),
                    entries,
                    chart_url: Some(state.chart_url()),
                }
            }
        }
    }
}

fn error_body(message: &str) -> serde_json::Value {
    json!({ "error": message })
}

/// Maps a finished run onto the `/run-test` failure bodies.
fn run_failure(data: &HttpState, run: &AnalysisRun) -> Option<HttpResponse> {
    match run.outcome {
        RunOutcome::Completed => None,
        RunOutcome::Failed { exit_code } => Some(
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Analysis failed", "exitCode": exit_code })),
        ),
        RunOutcome::TimedOut { after_secs } => {
            data.logs.error(SOURCE, "Analysis timed out");
            Some(HttpResponse::InternalServerError().json(json!({
                "error": "Analysis failed",
                "exitCode": null,
                "message": format!("Analysis timed out after {}s", after_secs),
            })))
        }
    }
}

fn start_failure(data: &HttpState, e: &AppError) -> HttpResponse {
    data.logs
        .error(SOURCE, &format!("Failed to start analysis: {}", e));
    HttpResponse::InternalServerError()
        .json(json!({ "error": "Failed to start analysis", "message": e.message() }))
}

async fn ingest(data: &HttpState, file: &Bytes) -> Result<AnalysisSession, HttpResponse> {
    let file_name = file.file_name.clone().unwrap_or_default();
    match data.upload.ingest(&file_name, &file.data).await {
        Ok(session) => {
            data.logs.info(
                SOURCE,
                &format!(
                    "Received {} ({} bytes), {} numeric columns",
                    session.file_name,
                    file.data.len(),
                    session.columns.len()
                ),
            );
            Ok(session)
        }
        Err(AppError::ValidationError(msg)) => {
            data.logs
                .warn(SOURCE, &format!("Rejected upload {:?}: {}", file_name, msg));
            Err(HttpResponse::BadRequest().json(error_body(&msg)))
        }
        Err(e) => {
            data.logs
                .error(SOURCE, &format!("Failed to store upload: {}", e));
            Err(HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to store upload", "message": e.message() })))
        }
    }
}

#[post("/run-test")]
async fn run_test(
    data: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<RunTestForm>,
) -> impl Responder {
    let Some(file) = form.csv else {
        data.logs.warn(SOURCE, "Missing file in /run-test");
        return HttpResponse::BadRequest().json(error_body("No file uploaded"));
    };

    let target = match normalize_target(form.target.as_ref().map(|t| t.as_str())) {
        Ok(target) => target,
        Err(e) => {
            data.logs.warn(SOURCE, "Missing target in /run-test");
            return HttpResponse::BadRequest().json(error_body(e.message()));
        }
    };

    let mut session = match ingest(&data, &file).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let run = data.analysis.execute(&mut session, target).await;
    let session_id = session.id.clone();
    data.register_session(session).await;

    match run {
        Ok(run) => match run_failure(&data, &run) {
            Some(response) => response,
            None => HttpResponse::Ok().json(json!({ "status": "done", "sessionId": session_id })),
        },
        Err(e) => start_failure(&data, &e),
    }
}

#[get("/analysis.json")]
async fn analysis_json(data: web::Data<HttpState>) -> impl Responder {
    match storage::read_result_raw(data.analysis.result_file()).await {
        Ok(Some(content)) => HttpResponse::Ok()
            .content_type("application/json")
            .body(content),
        Ok(None) => HttpResponse::NotFound().json(error_body(RESULTS_NOT_FOUND)),
        Err(e) => {
            data.logs
                .error(SOURCE, &format!("Failed to read results: {}", e));
            HttpResponse::InternalServerError().json(error_body(e.message()))
        }
    }
}

#[post("/ask-buddy")]
async fn ask_buddy(data: web::Data<HttpState>) -> impl Responder {
    match storage::read_result(data.analysis.result_file()).await {
        Ok(result) => {
            let text = data.narration.explain(result.as_ref()).await;
            HttpResponse::Ok().json(json!({ "text": text }))
        }
        Err(e) => {
            data.logs.error(SOURCE, &format!("Ask buddy error: {}", e));
            HttpResponse::InternalServerError().json(json!({ "text": ASK_BUDDY_FAILED }))
        }
    }
}

#[post("/columns")]
async fn upload_columns(
    data: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<ColumnsForm>,
) -> impl Responder {
    let Some(file) = form.csv else {
        return HttpResponse::BadRequest().json(error_body("No file uploaded"));
    };

    match ingest(&data, &file).await {
        Ok(session) => {
            let response = ColumnsResponse {
                session_id: session.id.clone(),
                file_name: session.file_name.clone(),
                columns: session.columns.clone(),
            };
            data.register_session(session).await;
            HttpResponse::Ok().json(response)
        }
        Err(response) => response,
    }
}

#[post("/sessions/{id}/run")]
async fn run_session(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    req: web::Json<RunRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let Some(mut session) = data.session(&id) else {
        return HttpResponse::NotFound().json(error_body("Session not found"));
    };

    let target = match normalize_target(req.target.as_deref()) {
        Ok(target) => target,
        Err(e) => return HttpResponse::BadRequest().json(error_body(e.message())),
    };

    data.logs.info(
        SOURCE,
        &format!("Re-running session {} with target \"{}\"", id, target),
    );

    let run = data.analysis.execute(&mut session, target).await;
    let last_result = session.last_result.clone();
    if !data.update_session(session) {
        data.logs.warn(
            SOURCE,
            &format!("Session {} was removed during the run, not restoring it", id),
        );
    }

    let run = match run {
        Ok(run) => run,
        Err(e) => return start_failure(&data, &e),
    };
    if let Some(response) = run_failure(&data, &run) {
        return response;
    }

    match last_result {
        Some(result) => HttpResponse::Ok().json(ReportResponse::build(&data, Some(id), &result)),
        None => {
            data.logs
                .error(SOURCE, "Analysis finished without writing a result");
            HttpResponse::InternalServerError().json(json!({
                "error": "Analysis failed",
                "message": "No result document was written",
            }))
        }
    }
}

#[get("/report")]
async fn get_report(data: web::Data<HttpState>, query: web::Query<ReportQuery>) -> impl Responder {
    let result = match &query.session_id {
        Some(id) => match data.session(id) {
            Some(session) => session.last_result,
            None => return HttpResponse::NotFound().json(error_body("Session not found")),
        },
        None => match storage::read_result(data.analysis.result_file()).await {
            Ok(result) => result,
            Err(e) => {
                data.logs
                    .error(SOURCE, &format!("Failed to read results: {}", e));
                return HttpResponse::InternalServerError().json(error_body(e.message()));
            }
        },
    };

    match result {
        Some(result) => HttpResponse::Ok().json(ReportResponse::build(
            &data,
            query.session_id.clone(),
            &result,
        )),
        None => HttpResponse::NotFound().json(error_body(RESULTS_NOT_FOUND)),
    }
}

#[delete("/sessions/{id}")]
async fn delete_session(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let Some(session) = data.remove_session(&id) else {
        return HttpResponse::NotFound().json(error_body("Session not found"));
    };

    if let Err(e) = data.upload.discard(&session).await {
        data.logs.warn(
            SOURCE,
            &format!("Failed to delete upload for session {}: {}", id, e),
        );
    }
    HttpResponse::Ok().json(json!({ "status": "deleted", "sessionId": id }))
}

#[get("/models")]
async fn list_models(data: web::Data<HttpState>) -> impl Responder {
    match data.llm_client.list_models(data.narration.config()).await {
        Ok(models) => HttpResponse::Ok().json(models),
        Err(e) => {
            data.logs
                .error(SOURCE, &format!("Failed to list models: {}", e));
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(data.logs.entries())
}

/// Every dynamic route; static files are mounted separately in `start_server`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(run_test)
        .service(analysis_json)
        .service(ask_buddy)
        .service(
            web::scope("/api")
                .service(upload_columns)
                .service(run_session)
                .service(get_report)
                .service(delete_session)
                .service(list_models)
                .service(get_logs),
        );
}

pub fn multipart_config(limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(limit)
        .memory_limit(limit)
}

pub fn start_server(state: web::Data<HttpState>) -> std::io::Result<Server> {
    let host = state.config.server.host.clone();
    let port = state.config.server.port;
    let limit = state.config.server.upload_limit_bytes;

    state.logs.info(
        SOURCE,
        &format!("Server running at http://{}:{}", host, port),
    );

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Local dashboard, any origin
        let paths = &state.config.paths;

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(multipart_config(limit))
            .configure(configure)
            .service(Files::new("/output", &paths.output_dir))
            .service(Files::new("/", &paths.frontend_dir).index_file(paths.index_file.clone()))
    })
    .bind((host.as_str(), port))?
    .run();

    Ok(server)
}
