#[allow(deprecated)]
use assert_cmd::Command;
use mockito::{Matcher, Server, ServerGuard};
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

const STUDENT: &str = "student_123";
const UNREACHABLE: &str = "http://127.0.0.1:9";

struct TestEnv {
    dir: TempDir,
    api_url: String,
}

impl TestEnv {
    fn new() -> Self {
        Self::with_api(UNREACHABLE)
    }

    fn with_api(api_url: &str) -> Self {
        let dir = TempDir::new().expect("create tempdir");
        Self {
            dir,
            api_url: api_url.to_string(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("admitdesk").expect("binary");
        cmd.current_dir(self.dir.path())
            .env_remove("ADMITDESK_HOME")
            .env_remove("ADMITDESK_STUDENT")
            .env_remove("ADMITDESK_LOG")
            .env("ADMITDESK_API_URL", &self.api_url);
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    fn write_file(&self, filename: &str, content: &str) -> PathBuf {
        let p = self.dir.path().join(filename);
        fs::write(&p, content).expect("write file");
        p
    }

    fn create_essay(&self, title: &str, content: &str) -> String {
        let v = self.run_ok(&[
            "essay", "create", "--title", title, "--prompt", "Tell us about yourself.",
            "--word-limit", "10", "--content", content,
        ]);
        v["data"]["id"].as_str().unwrap().to_string()
    }
}

fn profile_envelope() -> Value {
    json!({
        "profile": {
            "student_id": STUDENT,
            "current_grade": "11",
            "intended_major": "Computer Science",
            "weekly_hours_cap": 10
        },
        "activities": [{
            "id": "act-1",
            "title": "Robotics team",
            "lens": "Creativity",
            "type": "club",
            "role_level": "member",
            "hours_per_week": 5.0
        }]
    })
}

fn analysis_json() -> Value {
    json!({
        "scores": {
            "impact_total": 12.5,
            "lens_scores": {"Leadership": 1.5, "Creativity": 7.2},
            "coverage": 0.4
        },
        "gaps": [{"type": "lens_gap", "lens": "Leadership", "severity": 0.85}],
        "critical_improvements": [{
            "gap_type": "lens_gap",
            "gap_description": "Leadership lens is 1.5/10",
            "severity": 0.85,
            "tasks": [{
                "title": "Lead a club project",
                "track": "US",
                "estimated_hours": 6.0,
                "definition_of_done": ["Pick a project", "Recruit two members", "Present results"],
                "micro_coaching": "Start small.",
                "quick_links": []
            }]
        }],
        "lens_improvements": [{
            "lens": "Community",
            "current_score": 2.0,
            "improvement_opportunity": "Volunteer locally",
            "tasks": [{"title": "Tutor younger students", "definition_of_done": ["Find a program"]}]
        }]
    })
}

const LEAD_TASK: &str = "lead-a-club-project-leadership";

/// Mock the profile and analysis endpoints, run `portfolio analyze`, and
/// open the leadership task.
fn setup_with_analysis(server: &mut ServerGuard) -> TestEnv {
    server
        .mock("GET", format!("/profile/{STUDENT}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile_envelope().to_string())
        .create();
    server
        .mock("POST", "/portfolio/analyze")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(analysis_json().to_string())
        .create();

    let env = TestEnv::with_api(&server.url());
    env.run_ok(&["init"]);
    env.run_ok(&["portfolio", "analyze", "--school", "MIT"]);
    env.run_ok(&["learn", "open", LEAD_TASK]);
    env
}

fn completed_steps(v: &Value) -> Vec<String> {
    v["data"]["progress"]["completed_steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap().to_string())
        .collect()
}

// ─── 1. init / config ──────────────────────────────────────────────

#[test]
fn test_init() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    let path = v["data"]["path"].as_str().unwrap();
    assert!(path.ends_with(".admitdesk/admitdesk.db"));
    assert!(PathBuf::from(path).exists());
}

#[test]
fn test_init_idempotent() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_ok(&["init"]);
    assert!(v["data"]["path"].as_str().unwrap().contains("admitdesk.db"));
}

#[test]
fn test_init_required_before_commands() {
    let env = TestEnv::new();
    let v = env.run_err(&["essay", "list"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
    let v = env.run_err(&["config", "set", "student_id", "someone"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
}

#[test]
fn test_config_defaults_and_set() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);

    let v = env.run_ok(&["config", "show"]);
    assert_eq!(v["data"]["student_id"], STUDENT);
    assert_eq!(v["data"]["analyze_timeout_secs"], 60);
    assert_eq!(v["data"]["write_timeout_secs"], 15);

    env.run_ok(&["config", "set", "student_id", "student_456"]);
    let v = env.run_ok(&["config", "show"]);
    assert_eq!(v["data"]["student_id"], "student_456");

    // flag wins over the stored value
    let v = env.run_ok(&["config", "show", "--student", "flag_student"]);
    assert_eq!(v["data"]["student_id"], "flag_student");
}

#[test]
fn test_config_set_validation() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["config", "set", "api_url", "localhost:8000"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    let v = env.run_err(&["config", "set", "analyze_timeout_secs", "0"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    let v = env.run_err(&["config", "set", "colour", "blue"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

// ─── 2. essays ─────────────────────────────────────────────────────

#[test]
fn test_essay_crud_and_status() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);

    let id = env.create_essay("Personal statement", "");
    let v = env.run_ok(&["essay", "show", &id]);
    assert_eq!(v["data"]["status"], "not_started");
    assert_eq!(v["data"]["word_count"], 0);
    assert_eq!(v["data"]["has_analysis"], false);

    let v = env.run_ok(&["essay", "edit", &id, "--content", "one two three"]);
    assert_eq!(v["data"]["status"], "in_progress");
    assert_eq!(v["data"]["word_count"], 3);

    let v = env.run_ok(&["essay", "edit", &id, "--content", "a b c d e f g h i"]);
    assert_eq!(v["data"]["status"], "complete");

    // over the limit is no longer complete
    let v = env.run_ok(&["essay", "edit", &id, "--content", "a b c d e f g h i j k"]);
    assert_eq!(v["data"]["status"], "in_progress");

    let v = env.run_ok(&["essay", "show", &id]);
    assert_eq!(v["data"]["words_over_limit"], 1);

    env.run_ok(&["essay", "delete", &id]);
    let v = env.run_err(&["essay", "show", &id]);
    assert_eq!(v["error"]["code"], "ESSAY_NOT_FOUND");
}

#[test]
fn test_essay_status_override_and_validation() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let id = env.create_essay("Why us", "draft");

    let v = env.run_ok(&["essay", "edit", &id, "--status", "complete"]);
    assert_eq!(v["data"]["status"], "complete");
    let v = env.run_err(&["essay", "edit", &id, "--status", "finished"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let v = env.run_err(&["essay", "create", "--title", " ", "--prompt", "p"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_essay_content_from_file() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let path = env.write_file("draft.txt", "  words from a file  \n");
    let v = env.run_ok(&[
        "essay", "create", "--title", "From file", "--prompt", "p",
        "--file", path.to_str().unwrap(),
    ]);
    assert_eq!(v["data"]["content"], "words from a file");
    assert_eq!(v["data"]["word_count"], 4);
}

#[test]
fn test_essay_list_groups_by_college() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.create_essay("General one", "");
    env.run_ok(&[
        "essay", "create", "--title", "Why State", "--prompt", "Why us?",
        "--college-id", "c-1", "--college-name", "State University",
    ]);

    let v = env.run_ok(&["essay", "list"]);
    assert_eq!(v["data"]["total"], 2);
    assert_eq!(v["data"]["general"].as_array().unwrap().len(), 1);
    let colleges = v["data"]["colleges"].as_array().unwrap();
    assert_eq!(colleges.len(), 1);
    assert_eq!(colleges[0]["college_name"], "State University");
    assert_eq!(colleges[0]["essays"][0]["title"], "Why State");
}

#[test]
fn test_essay_analyze_caches_result() {
    let mut server = Server::new();
    let env = TestEnv::with_api(&server.url());
    env.run_ok(&["init"]);
    let id = env.create_essay("Personal", "I built a robot with my friends.");

    let mock = server
        .mock("POST", "/essays/analyze-text")
        .match_body(Matcher::PartialJson(json!({
            "essay_id": id,
            "target_word_count": 10
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "an-1",
                "essay_id": id,
                "overall_score": 7.5,
                "strengths": ["Vivid"],
                "weaknesses": ["Short"],
                "structure_score": 7.0,
                "content_score": 8.0,
                "tone_score": 7.0,
                "prompt_alignment_score": 6.5,
                "readability_score": 65.0,
                "word_count": 7,
                "target_word_count": 10,
                "suggestions": [{
                    "type": "content",
                    "priority": "high",
                    "explanation": "Add a concrete outcome."
                }],
                "created_at": "2026-10-01T12:00:00Z"
            })
            .to_string(),
        )
        .create();

    let v = env.run_ok(&["essay", "analyze", &id]);
    assert_eq!(v["data"]["overall_score"], 7.5);
    mock.assert();

    let v = env.run_ok(&["essay", "analysis", &id]);
    assert_eq!(v["data"]["suggestions"][0]["priority"], "high");
    let v = env.run_ok(&["essay", "show", &id]);
    assert_eq!(v["data"]["has_analysis"], true);

    // clearing the session drops the cached analysis but keeps the essay
    env.run_ok(&["cache", "clear"]);
    env.run_err(&["essay", "analysis", &id]);
    env.run_ok(&["essay", "show", &id]);
}

#[test]
fn test_essay_analyze_backend_detail_error() {
    let mut server = Server::new();
    server
        .mock("POST", "/essays/analyze-text")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Essay analysis failed: model offline"}"#)
        .create();
    let env = TestEnv::with_api(&server.url());
    env.run_ok(&["init"]);
    let id = env.create_essay("Personal", "some text");

    let v = env.run_err(&["essay", "analyze", &id]);
    assert_eq!(v["error"]["code"], "BACKEND_ERROR");
    assert!(v["error"]["message"].as_str().unwrap().contains("model offline"));
}

#[test]
fn test_essay_analyze_rejects_empty_essay() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let id = env.create_essay("Empty", "");
    let v = env.run_err(&["essay", "analyze", &id]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

// ─── 3. profile & activities ───────────────────────────────────────

#[test]
fn test_profile_404_is_empty_state() {
    let mut server = Server::new();
    server
        .mock("GET", format!("/profile/{STUDENT}").as_str())
        .with_status(404)
        .with_body(r#"{"detail": "Profile not found"}"#)
        .create();
    let env = TestEnv::with_api(&server.url());

    let v = env.run_ok(&["profile", "show"]);
    assert!(v["data"]["profile"].is_null());
    assert_eq!(v["data"]["activities"].as_array().unwrap().len(), 0);
}

#[test]
fn test_profile_set_merges_and_posts() {
    let mut server = Server::new();
    server
        .mock("GET", format!("/profile/{STUDENT}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile_envelope().to_string())
        .create();
    let post = server
        .mock("POST", format!("/profile/{STUDENT}").as_str())
        .match_body(Matcher::PartialJson(json!({
            "current_grade": "12",
            "intended_major": "Computer Science",
            "tests": {"sat": {"score": 1480}}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true}"#)
        .create();
    let env = TestEnv::with_api(&server.url());

    let v = env.run_ok(&["profile", "set", "--grade", "12", "--sat", "1480"]);
    assert_eq!(v["data"]["created"], false);
    post.assert();
}

#[test]
fn test_profile_create_requires_grade() {
    let mut server = Server::new();
    server
        .mock("GET", format!("/profile/{STUDENT}").as_str())
        .with_status(404)
        .create();
    let env = TestEnv::with_api(&server.url());
    let v = env.run_err(&["profile", "set", "--major", "History"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_activity_add_normalizes_lens() {
    let mut server = Server::new();
    let add = server
        .mock("POST", format!("/profile/{STUDENT}/activities").as_str())
        .match_body(Matcher::PartialJson(json!({
            "title": "Food bank",
            "lens": "Community",
            "type": "volunteer",
            "role_level": "organizer"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "act-9", "title": "Food bank", "lens": "Community",
                "type": "volunteer", "role_level": "organizer"
            })
            .to_string(),
        )
        .create();
    let env = TestEnv::with_api(&server.url());

    let v = env.run_ok(&[
        "activity", "add", "--title", "Food bank", "--lens", "community",
        "--type", "volunteer", "--role-level", "organizer",
    ]);
    assert_eq!(v["data"]["id"], "act-9");
    add.assert();

    let v = env.run_err(&[
        "activity", "add", "--title", "X", "--lens", "Sports", "--type", "t", "--role-level", "r",
    ]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_activity_update_and_missing() {
    let mut server = Server::new();
    server
        .mock("GET", format!("/profile/{STUDENT}/activities").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile_envelope()["activities"].to_string())
        .create();
    let put = server
        .mock("PUT", format!("/profile/{STUDENT}/activities/act-1").as_str())
        .match_body(Matcher::PartialJson(json!({"title": "Robotics team", "hours_per_week": 8.0})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "act-1", "title": "Robotics team", "lens": "Creativity",
                "type": "club", "role_level": "member", "hours_per_week": 8.0
            })
            .to_string(),
        )
        .create();
    server
        .mock("DELETE", format!("/profile/{STUDENT}/activities/ghost").as_str())
        .with_status(404)
        .with_body(r#"{"detail": "Activity not found"}"#)
        .create();
    let env = TestEnv::with_api(&server.url());

    let v = env.run_ok(&["activity", "update", "act-1", "--hours-per-week", "8"]);
    assert_eq!(v["data"]["hours_per_week"], 8.0);
    put.assert();

    let v = env.run_err(&["activity", "update", "ghost", "--title", "Nope"]);
    assert_eq!(v["error"]["code"], "ACTIVITY_NOT_FOUND");
    let v = env.run_err(&["activity", "remove", "ghost"]);
    assert_eq!(v["error"]["code"], "ACTIVITY_NOT_FOUND");
}

#[test]
fn test_backend_unavailable() {
    let env = TestEnv::new();
    let v = env.run_err(&["profile", "show"]);
    assert_eq!(v["error"]["code"], "BACKEND_UNAVAILABLE");
    let v = env.run_err(&["backend", "health"]);
    assert_eq!(v["error"]["code"], "BACKEND_UNAVAILABLE");
}

#[test]
fn test_backend_health() {
    let mut server = Server::new();
    server
        .mock("GET", "/healthz")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "ok"}"#)
        .create();
    let env = TestEnv::with_api(&server.url());
    let v = env.run_ok(&["backend", "health"]);
    assert_eq!(v["data"]["healthy"], true);
    assert_eq!(v["data"]["response"]["status"], "ok");
}

#[test]
fn test_backend_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    // Accept connections and hold them open without ever answering.
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });

    let env = TestEnv::with_api(&format!("http://{addr}"));
    env.run_ok(&["init"]);
    env.run_ok(&["config", "set", "request_timeout_secs", "1"]);

    let started = Instant::now();
    let v = env.run_err(&["profile", "show"]);
    assert_eq!(v["error"]["code"], "BACKEND_TIMEOUT");
    assert!(v["error"]["message"].as_str().unwrap().contains("timed out"));
    assert!(started.elapsed() < Duration::from_secs(20));
}

// ─── 4. portfolio ──────────────────────────────────────────────────

#[test]
fn test_portfolio_requires_profile() {
    let mut server = Server::new();
    server
        .mock("GET", format!("/profile/{STUDENT}").as_str())
        .with_status(404)
        .create();
    let analyze = server.mock("POST", "/portfolio/analyze").expect(0).create();
    let env = TestEnv::with_api(&server.url());
    env.run_ok(&["init"]);

    let v = env.run_err(&["portfolio", "analyze", "--school", "MIT"]);
    assert_eq!(v["error"]["code"], "PROFILE_INCOMPLETE");
    analyze.assert();
}

#[test]
fn test_portfolio_requires_school() {
    let mut server = Server::new();
    server
        .mock("GET", format!("/profile/{STUDENT}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile_envelope().to_string())
        .create();
    let env = TestEnv::with_api(&server.url());
    env.run_ok(&["init"]);
    let v = env.run_err(&["portfolio", "analyze", "--school", "  "]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_portfolio_analyze_caches_report() {
    let mut server = Server::new();
    server
        .mock("GET", format!("/profile/{STUDENT}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile_envelope().to_string())
        .create();
    let analyze = server
        .mock("POST", "/portfolio/analyze")
        .match_body(Matcher::PartialJson(json!({
            "country_tracks": ["US"],
            "schools": ["MIT"],
            "weekly_hours_cap": 10,
            "deadlines": {"MIT": "2026-11-01"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(analysis_json().to_string())
        .create();
    let env = TestEnv::with_api(&server.url());
    env.run_ok(&["init"]);

    let v = env.run_err(&["portfolio", "show"]);
    assert_eq!(v["error"]["code"], "ANALYSIS_NOT_FOUND");

    let v = env.run_ok(&["portfolio", "analyze", "--school", "MIT", "--deadline", "MIT=2026-11-01"]);
    assert_eq!(v["data"]["scores"]["impact_total"], 12.5);
    analyze.assert();

    // cached report survives without the backend
    let offline = TestEnv {
        dir: env.dir,
        api_url: UNREACHABLE.to_string(),
    };
    let v = offline.run_ok(&["portfolio", "show"]);
    assert_eq!(v["data"]["gaps"][0]["lens"], "Leadership");

    let v = offline.run_ok(&["portfolio", "tasks"]);
    let tasks = v["data"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["id"], LEAD_TASK);
    assert_eq!(tasks[0]["lens"], "Leadership");
    assert_eq!(tasks[1]["id"], "tutor-younger-students-community");
}

// ─── 5. learning progress ──────────────────────────────────────────

#[test]
fn test_learn_open_initializes_progress() {
    let mut server = Server::new();
    let env = setup_with_analysis(&mut server);

    let v = env.run_ok(&["learn", "show", LEAD_TASK]);
    assert_eq!(v["data"]["task"]["lensName"], "Leadership");
    assert_eq!(v["data"]["task"]["gapDescription"], "Leadership lens is 1.5/10");
    assert_eq!(v["data"]["steps"].as_array().unwrap().len(), 3);
    assert_eq!(v["data"]["steps"][0]["id"], "step-1");
    assert_eq!(v["data"]["current_step"], "step-1");
    assert_eq!(v["data"]["progress"]["current_step"], 0);
    assert!(v["data"]["progress"]["started_at"].is_string());
}

#[test]
fn test_learn_unknown_and_unopened_tasks() {
    let mut server = Server::new();
    let env = setup_with_analysis(&mut server);

    let v = env.run_err(&["learn", "open", "no-such-task"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
    let v = env.run_err(&["learn", "show", "tutor-younger-students-community"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_OPENED");
}

#[test]
fn test_learn_toggle_twice_restores_state() {
    let mut server = Server::new();
    let env = setup_with_analysis(&mut server);
    env.run_ok(&["learn", "complete", LEAD_TASK, "1"]);

    for step in ["step-1", "step-2", "step-3"] {
        let before = env.run_ok(&["learn", "show", LEAD_TASK]);
        env.run_ok(&["learn", "toggle", LEAD_TASK, step]);
        let after = env.run_ok(&["learn", "toggle", LEAD_TASK, step]);

        let mut a = completed_steps(&before);
        let mut b = completed_steps(&after);
        a.sort();
        b.sort();
        assert_eq!(a, b, "toggling {step} twice changed the completed set");
        assert_eq!(
            after["data"]["progress"]["current_step"],
            b.len(),
            "current_step must equal the completed count"
        );
    }
}

#[test]
fn test_learn_progress_reload_is_verbatim() {
    let mut server = Server::new();
    let env = setup_with_analysis(&mut server);

    env.run_ok(&["learn", "complete", LEAD_TASK, "step-2"]);
    env.run_ok(&["learn", "note", LEAD_TASK, "Asked the club advisor"]);
    env.run_ok(&["learn", "log-time", LEAD_TASK, "25"]);
    let first = env.run_ok(&["learn", "show", LEAD_TASK]);
    let second = env.run_ok(&["learn", "show", LEAD_TASK]);

    assert_eq!(first["data"]["progress"], second["data"]["progress"]);
    assert_eq!(completed_steps(&first), vec!["step-2"]);
    assert_eq!(first["data"]["progress"]["notes"], "Asked the club advisor");
    assert_eq!(first["data"]["progress"]["time_spent"], 25);
    assert_eq!(first["data"]["progress"]["percentage"], 33);
    assert_eq!(first["data"]["current_step"], "step-1");
}

#[test]
fn test_learn_completion_and_reset() {
    let mut server = Server::new();
    let env = setup_with_analysis(&mut server);

    for step in ["1", "2", "3"] {
        env.run_ok(&["learn", "complete", LEAD_TASK, step]);
    }
    let v = env.run_ok(&["learn", "show", LEAD_TASK]);
    assert_eq!(v["data"]["progress"]["percentage"], 100);
    assert!(v["data"]["progress"]["completed_at"].is_string());
    assert_eq!(v["data"]["current_step"], "step-3");

    let v = env.run_ok(&["learn", "uncomplete", LEAD_TASK, "3"]);
    assert!(v["data"]["progress"]["completed_at"].is_null());

    let v = env.run_ok(&["learn", "reset", LEAD_TASK]);
    assert_eq!(v["data"]["reset"], true);
    let v = env.run_ok(&["learn", "show", LEAD_TASK]);
    assert_eq!(v["data"]["progress"]["completed_steps"].as_array().unwrap().len(), 0);
}

#[test]
fn test_learn_step_not_found() {
    let mut server = Server::new();
    let env = setup_with_analysis(&mut server);
    let v = env.run_err(&["learn", "toggle", LEAD_TASK, "step-4"]);
    assert_eq!(v["error"]["code"], "STEP_NOT_FOUND");
    let v = env.run_err(&["learn", "complete", LEAD_TASK, "intro"]);
    assert_eq!(v["error"]["code"], "STEP_NOT_FOUND");
}

#[test]
fn test_learn_list_and_status() {
    let mut server = Server::new();
    let env = setup_with_analysis(&mut server);
    env.run_ok(&["learn", "complete", LEAD_TASK, "1"]);
    env.create_essay("Personal", "");

    let v = env.run_ok(&["learn", "list"]);
    let items = v["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["task_id"], LEAD_TASK);
    assert_eq!(items[0]["total_steps"], 3);
    assert_eq!(items[0]["percentage"], 33);

    let v = env.run_ok(&["status"]);
    assert_eq!(v["data"]["student_id"], STUDENT);
    assert_eq!(v["data"]["essays"]["total"], 1);
    assert_eq!(v["data"]["essays"]["by_status"]["not_started"], 1);
    assert_eq!(v["data"]["open_tasks"][0]["percentage"], 33);
    assert_eq!(v["data"]["analysis"]["impact_total"], 12.5);
}

// ─── 6. exit codes / text output ───────────────────────────────────

#[test]
fn test_exit_code_0_on_success() {
    let env = TestEnv::new();
    env.cmd().args(["init"]).assert().success();
}

#[test]
fn test_exit_code_1_on_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["essay", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_text_output_renders_checklist() {
    let mut server = Server::new();
    let env = setup_with_analysis(&mut server);
    env.run_ok(&["learn", "complete", LEAD_TASK, "1"]);
    env.cmd()
        .args(["learn", "show", LEAD_TASK])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] step-1 Pick a project"))
        .stdout(predicate::str::contains("step-2 Recruit two members <- next"));
}
