#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        Self { dir }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("reachai").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("RUST_LOG");
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

    /// Run a JSON session; one parsed response per non-blank input line.
    fn session(&self, script: &str) -> Vec<Value> {
        self.session_with(&[], script)
    }

    fn session_with(&self, extra: &[&str], script: &str) -> Vec<Value> {
        let mut args = vec!["session", "--json"];
        args.extend_from_slice(extra);
        let output = self
            .cmd()
            .args(&args)
            .write_stdin(script)
            .output()
            .expect("session");
        assert!(output.status.success(), "session exited with {:?}", output.status);
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .map(|l| {
                serde_json::from_str(l)
                    .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nline: {l}"))
            })
            .collect()
    }
}

fn live_segments(list: &Value) -> Vec<String> {
    list["data"]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["segment"].as_str().unwrap().to_string())
        .collect()
}

// ─── 1. catalog ────────────────────────────────────────────────────

#[test]
fn test_segments_carry_priority() {
    let env = TestEnv::new();
    let v = env.run_ok(&["segments"]);
    let segments = v["data"]["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 6);
    let active = segments.iter().find(|s| s["name"] == "活跃低转化").unwrap();
    assert_eq!(active["priority"], "P0");
    assert_eq!(active["priority_reason"], "用户规模大 × 流失风险高");
    assert_eq!(active["count"], 2340);
}

#[test]
fn test_funnel_marks_single_actionable_pair() {
    let env = TestEnv::new();
    let v = env.run_ok(&["funnel"]);
    assert_eq!(v["data"]["steps"].as_array().unwrap().len(), 5);
    let pairs = v["data"]["pairs"].as_array().unwrap();
    assert_eq!(pairs.len(), 4);
    let actionable: Vec<_> = pairs.iter().filter(|p| p["actionable"] == true).collect();
    assert_eq!(actionable.len(), 1);
    assert_eq!(actionable[0]["segment"], "加购→下单流失用户");
    assert_eq!(pairs[0]["drop_off_rate"], 15.0);
}

#[test]
fn test_funnel_all_pairs_from_config() {
    let env = TestEnv::new();
    let cfg = env.write_file("cfg.json", r#"{"funnel":{"all_pairs_actionable":true}}"#);
    let v = env.run_ok(&["funnel", "--config", cfg.to_str().unwrap()]);
    let pairs = v["data"]["pairs"].as_array().unwrap();
    assert!(pairs.iter().all(|p| p["actionable"] == true));
}

#[test]
fn test_bad_config_is_error() {
    let env = TestEnv::new();
    let cfg = env.write_file("cfg.json", r#"{"default_channel":"fax"}"#);
    let v = env.run_err(&["tasks", "--config", cfg.to_str().unwrap()]);
    assert_eq!(v["error"]["code"], "CONFIG_ERROR");
}

// ─── 2. copy preview ───────────────────────────────────────────────

#[test]
fn test_copy_single_benefit() {
    let env = TestEnv::new();
    let v = env.run_ok(&["copy", "活跃低转化", "--benefit", "券"]);
    assert_eq!(v["data"]["title"], "活跃低转化专属专属优惠券活动");
    assert_eq!(
        v["data"]["content"],
        "尊敬的活跃用户，我们为您准备了专属优惠券，立即查看！点击领取优惠券，期待您的参与。"
    );
}

#[test]
fn test_copy_accepts_segment_id_and_combined_benefits() {
    let env = TestEnv::new();
    let v = env.run_ok(&["copy", "4", "--channel", "edm", "--benefit", "赠品,积分"]);
    assert_eq!(v["data"]["segment"], "高价值低频次");
    assert_eq!(v["data"]["channel"], "edm");
    assert_eq!(v["data"]["title"], "高价值低频次专属赠品、积分活动");
}

#[test]
fn test_copy_without_benefits() {
    let env = TestEnv::new();
    let v = env.run_ok(&["copy", "新客"]);
    assert_eq!(v["data"]["title"], "新客专属权益活动");
    assert_eq!(
        v["data"]["content"],
        "尊敬的客户，我们为您准备了专属权益，查看详情！点击查看详情。"
    );
}

#[test]
fn test_copy_bad_channel() {
    let env = TestEnv::new();
    let v = env.run_err(&["copy", "沉没流失", "--channel", "fax"]);
    assert_eq!(v["error"]["code"], "VALIDATION_FAILED");
}

// ─── 3. seeded tasks ───────────────────────────────────────────────

#[test]
fn test_tasks_seeded_and_sorted() {
    let env = TestEnv::new();
    let v = env.run_ok(&["tasks"]);
    let tasks = v["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 6);
    let tiers: Vec<_> = tasks.iter().map(|t| t["priority"].as_str().unwrap()).collect();
    assert_eq!(tiers, vec!["P0", "P0", "P1", "P1", "P2", "P2"]);
    assert_eq!(tasks[0]["segment"], "加购未购买");

    let selected = v["data"]["selected"].as_str().unwrap();
    let active = tasks.iter().find(|t| t["id"] == selected).unwrap();
    assert_eq!(active["segment"], "活跃低转化");
    assert_eq!(active["status"], "viewed");
    assert_eq!(v["data"]["summary"]["text"], "共 6 个任务，6 个待处理");
}

#[test]
fn test_tasks_without_seeding() {
    let env = TestEnv::new();
    let cfg = env.write_file("cfg.json", r#"{"seed_on_start":false}"#);
    let v = env.run_ok(&["tasks", "--config", cfg.to_str().unwrap()]);
    assert!(v["data"]["tasks"].as_array().unwrap().is_empty());
    assert!(v["data"]["selected"].is_null());
    assert_eq!(v["data"]["summary"]["text"], "暂无任务");
}

// ─── 4. session: lifecycle ─────────────────────────────────────────

#[test]
fn test_session_segment_reuses_live_task() {
    let env = TestEnv::new();
    let out = env.session("segment 收藏未购买\nsegment 1\nsummary\n");
    assert_eq!(out.len(), 3);
    let first = &out[0]["data"]["task"];
    let second = &out[1]["data"]["task"];
    assert_eq!(first["id"], second["id"]);
    assert_eq!(first["status"], "viewed");
    assert_eq!(out[1]["data"]["notices"][0]["kind"], "reused");
    assert_eq!(out[1]["data"]["notices"][0]["message"], "已选中收藏未购买的现有任务");
    assert_eq!(out[2]["data"]["summary"]["total"], 6);
}

#[test]
fn test_session_funnel_task_once() {
    let env = TestEnv::new();
    let out = env.session("funnel 加购 下单\nfunnel 加购 下单\nlist\n");
    let task = &out[0]["data"]["task"];
    assert_eq!(task["segment"], "加购→下单流失用户");
    assert_eq!(task["title"], "加购→下单流失召回任务");
    assert_eq!(task["priority"], "P3");
    assert_eq!(task["priority_reason"], "用户规模小");
    assert_eq!(out[0]["data"]["notices"][0]["message"], "已生成加购→下单流失召回任务");
    assert_eq!(out[1]["data"]["task"]["id"], task["id"]);
    assert_eq!(out[2]["data"]["summary"]["total"], 7);
    assert_eq!(live_segments(&out[2]).last().unwrap(), "加购→下单流失用户");
}

#[test]
fn test_session_funnel_rejects_inactive_pair() {
    let env = TestEnv::new();
    let out = env.session("funnel 首页 浏览\nfunnel 首页 支付\n");
    assert_eq!(out[0]["success"], false);
    assert_eq!(out[0]["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(out[1]["error"]["code"], "SEGMENT_NOT_FOUND");
}

#[test]
fn test_session_execute_and_ignore() {
    let env = TestEnv::new();
    let out = env.session(
        "execute\nexecute\nsegment 沉没流失\nignore\nexecute\nlist --all\n",
    );
    // The seeded selection is 活跃低转化.
    assert_eq!(out[0]["data"]["task"]["segment"], "活跃低转化");
    assert_eq!(out[0]["data"]["task"]["status"], "executed");
    assert_eq!(out[0]["data"]["notices"][0]["message"], "任务已执行");
    assert_eq!(out[1]["error"]["code"], "INVALID_STATUS_TRANSITION");

    assert_eq!(out[3]["data"]["task"]["status"], "ignored");
    assert!(out[3]["data"]["selected"].is_null());
    assert_eq!(out[4]["error"]["code"], "TASK_NOT_FOUND");

    let all = live_segments(&out[5]);
    assert_eq!(all.len(), 6);
    assert_eq!(all.last().unwrap(), "沉没流失");
    assert_eq!(out[5]["data"]["summary"]["live"], 5);
}

#[test]
fn test_session_ignored_segment_can_be_recreated() {
    let env = TestEnv::new();
    let out = env.session("segment 沉没流失\nignore\nsegment 沉没流失\n");
    let old = out[1]["data"]["task"]["id"].clone();
    let new = &out[2]["data"]["task"];
    assert_ne!(new["id"], old);
    assert_eq!(new["status"], "viewed");
    assert_eq!(out[2]["data"]["notices"][0]["message"], "已为沉没流失生成任务");
}

#[test]
fn test_session_add_task_defaults_to_p0() {
    let env = TestEnv::new();
    let cfg = env.write_file("cfg.json", r#"{"seed_on_start":false}"#);
    let out = env.session_with(
        &["--config", cfg.to_str().unwrap()],
        "add 沉没流失 --channel sms --benefit 积分 --benefit 晒单分享奖励\nlist\n",
    );
    let task = &out[0]["data"]["task"];
    assert_eq!(task["priority"], "P0");
    assert_eq!(task["channel"], "sms");
    assert_eq!(task["status"], "viewed");
    assert_eq!(task["copy_title"], "沉没流失专属积分、晒单分享奖励活动");
    assert_eq!(out[0]["data"]["notices"][0]["message"], "任务已加入工作台");
    assert_eq!(out[1]["data"]["summary"]["total"], 1);
}

#[test]
fn test_session_add_reuses_live_segment_task() {
    let env = TestEnv::new();
    let out = env.session("add 沉没流失 --channel sms --benefit 积分 --priority P0\nlist\n");
    let task = &out[0]["data"]["task"];
    // The seeded task is selected as-is; the add arguments are not applied.
    assert_eq!(task["priority"], "P2");
    assert_eq!(task["channel"], "push");
    assert_eq!(out[0]["data"]["notices"][0]["kind"], "reused");
    assert_eq!(out[0]["data"]["notices"][0]["message"], "已选中沉没流失的现有任务");

    let live = live_segments(&out[1]);
    assert_eq!(live.iter().filter(|s| *s == "沉没流失").count(), 1);
    assert_eq!(out[1]["data"]["summary"]["total"], 6);
}

#[test]
fn test_session_add_after_ignore_creates_new_task() {
    let env = TestEnv::new();
    let out = env.session("segment 沉没流失\nignore\nadd 沉没流失 --channel edm\nlist --all\n");
    let old = &out[1]["data"]["task"]["id"];
    let task = &out[2]["data"]["task"];
    assert_ne!(&task["id"], old);
    assert_eq!(task["priority"], "P0");
    assert_eq!(task["channel"], "edm");
    assert_eq!(out[3]["data"]["summary"]["total"], 7);
    assert_eq!(out[3]["data"]["summary"]["live"], 6);
}

// ─── 5. session: copy override ─────────────────────────────────────

#[test]
fn test_session_benefit_change_regenerates_copy() {
    let env = TestEnv::new();
    let out = env.session("set benefits 赠品\nset channel edm\n");
    let task = &out[0]["data"]["task"];
    assert_eq!(task["copy_title"], "活跃低转化专属精美赠品活动");
    assert_eq!(task["is_manually_edited"], false);
    assert_eq!(out[1]["data"]["task"]["channel"], "edm");
    assert_eq!(out[1]["data"]["notices"][0]["message"], "文案已按邮件重新生成");
}

#[test]
fn test_session_manual_edit_freezes_copy() {
    let env = TestEnv::new();
    let out = env.session("set copy_content 手写 文案\nset benefits 赠品\nset title 新任务\n");
    assert_eq!(out[0]["data"]["task"]["is_manually_edited"], true);
    let task = &out[1]["data"]["task"];
    assert_eq!(task["copy_content"], "手写 文案");
    assert_eq!(task["copy_title"], "活跃低转化专属专属优惠券活动");
    assert_eq!(task["benefits"], serde_json::json!(["赠品"]));
    assert!(out[1]["data"]["notices"].as_array().unwrap().is_empty());
    assert_eq!(out[2]["data"]["task"]["title"], "新任务");
    assert_eq!(out[2]["data"]["task"]["is_manually_edited"], true);
}

#[test]
fn test_session_rejects_non_editable_field() {
    let env = TestEnv::new();
    let out = env.session("set status executed\nbogus\n");
    assert_eq!(out[0]["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(out[1]["error"]["code"], "VALIDATION_FAILED");
}

#[test]
fn test_session_short_prefix_is_ambiguous() {
    let env = TestEnv::new();
    // Seeded ids share their timestamp prefix.
    let out = env.session("select 0\nselect 0000\n");
    assert_eq!(out[0]["error"]["code"], "AMBIGUOUS_REF");
    assert_eq!(out[1]["error"]["code"], "TASK_NOT_FOUND");
}

#[test]
fn test_session_select_then_show() {
    let env = TestEnv::new();
    let out = env.session("segment 高价值高频次\nshow\n");
    assert_eq!(out[1]["data"]["task"]["segment"], "高价值高频次");
    assert_eq!(out[1]["data"]["task"]["status"], "viewed");
    assert!(out[1]["data"]["task"]["viewed_at"].is_string());
}

// ─── 6. import ─────────────────────────────────────────────────────

#[test]
fn test_import_valid_header() {
    let env = TestEnv::new();
    let p = env.write_file("events.csv", "user_id,event_type,timestamp,amount\n1,pv,1511544070,\n");
    let v = env.run_ok(&["import", p.to_str().unwrap()]);
    assert_eq!(v["data"]["valid"], true);
    assert_eq!(v["data"]["optional_present"], serde_json::json!(["amount"]));
}

#[test]
fn test_import_missing_fields() {
    let env = TestEnv::new();
    let p = env.write_file("events.csv", "user_id,item_id\n");
    let v = env.run_err(&["import", p.to_str().unwrap()]);
    assert_eq!(v["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(v["data"]["missing"], serde_json::json!(["event_type", "timestamp"]));
}

#[test]
fn test_import_rejects_other_formats() {
    let env = TestEnv::new();
    let p = env.write_file("events.json", "{}");
    let v = env.run_err(&["import", p.to_str().unwrap()]);
    assert_eq!(v["error"]["code"], "VALIDATION_FAILED");
}

// ─── 7. exit codes & text output ──────────────────────────────────

#[test]
fn test_exit_code_1_on_error() {
    let env = TestEnv::new();
    let p = env.write_file("events.csv", "foo\n");
    env.cmd().args(["import", p.to_str().unwrap()]).assert().code(1);
}

#[test]
fn test_template_text_output() {
    let env = TestEnv::new();
    env.cmd()
        .args(["template"])
        .assert()
        .success()
        .stdout("user_id,event_type,timestamp,item_id,category_id,amount,channel\n");
}

#[test]
fn test_text_output_tasks() {
    let env = TestEnv::new();
    env.cmd()
        .args(["tasks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("共 6 个任务，6 个待处理"))
        .stdout(predicate::str::contains("活跃低转化召回任务"));
}

#[test]
fn test_text_output_session_error_continues() {
    let env = TestEnv::new();
    env.cmd()
        .args(["session"])
        .write_stdin("select nope\nsummary\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Task not found: nope"))
        .stdout(predicate::str::contains("共 6 个任务"));
}
