// tests/launch_chains.rs

mod common;
use crate::common::{ConfigFileBuilder, Fixture};

use std::collections::BTreeSet;
use std::error::Error;
use std::path::{Path, PathBuf};

use proptest::prelude::*;

use charm::cli::CliArgs;
use charm::config::ArtifactConfig;
use charm::engine::TaskInvocation;
use charm::exec::OutputMode;
use charm::tasks::{LaunchFlag, LaunchRequest, Launcher, SHADER_PATH_VAR};
use clap::Parser;

type TestResult = Result<(), Box<dyn Error>>;

fn cli_invocation(argv: &[&str]) -> Result<TaskInvocation, Box<dyn Error>> {
    let args = CliArgs::try_parse_from(argv)?;
    let task = args.task.ok_or("no subcommand")?;
    Ok(task.into_invocation().ok_or("not a task")?)
}

#[tokio::test]
async fn rbot_builds_its_target_then_launches_default_object() -> TestResult {
    let fx = Fixture::fresh(ConfigFileBuilder::new().build());

    let mut orch = fx.orchestrator();
    orch.invoke(cli_invocation(&["charm", "rbot"])?).await?;

    let runs = fx.journal.invocations();
    assert_eq!(runs.len(), 2);

    assert_eq!(runs[0].spec.argv(), &["ninja", "-j4", "rbot"]);
    assert_eq!(runs[0].cwd, Path::new("/repo/build"));

    assert_eq!(
        runs[1].spec.argv(),
        &["/repo/build/rbot", "/repo/objects/box.obj"]
    );
    assert_eq!(runs[1].cwd, Path::new("/repo"));
    assert_eq!(runs[1].spec.env_overlay()[SHADER_PATH_VAR], "/repo/shaders");
    Ok(())
}

#[tokio::test]
async fn rbot_no_ninja_skips_the_build() -> TestResult {
    let fx = Fixture::fresh(ConfigFileBuilder::new().build());

    let mut orch = fx.orchestrator();
    orch.invoke(cli_invocation(&["charm", "rbot", "--no-ninja", "objects/cup.obj"])?)
        .await?;

    let runs = fx.journal.invocations();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].spec.argv(), &["/repo/build/rbot", "objects/cup.obj"]);
    assert_eq!(orch.report().state_of("build"), None);
    Ok(())
}

#[tokio::test]
async fn shm_flag_reaches_the_launched_program() -> TestResult {
    let fx = Fixture::fresh(ConfigFileBuilder::new().build());

    let mut orch = fx.orchestrator();
    orch.invoke(cli_invocation(&[
        "charm",
        "rbot",
        "--shm",
        "--no-ninja",
        "--env",
        "QT_QPA_PLATFORM=offscreen",
    ])?)
    .await?;

    let launch = &fx.journal.invocations()[0];
    assert_eq!(
        launch.spec.to_shell_line(),
        "/repo/build/rbot --video shm /repo/objects/box.obj"
    );
    assert_eq!(launch.spec.env_overlay()["QT_QPA_PLATFORM"], "offscreen");
    Ok(())
}

#[tokio::test]
async fn shmvideo_launches_without_positional() -> TestResult {
    let fx = Fixture::fresh(ConfigFileBuilder::new().build());

    let mut orch = fx.orchestrator();
    orch.invoke(cli_invocation(&["charm", "shmvideo", "--device", "/dev/video0"])?)
        .await?;

    let runs = fx.journal.invocations();
    assert_eq!(runs[0].spec.argv(), &["ninja", "-j4", "shmvideo"]);
    assert_eq!(
        runs[1].spec.argv(),
        &["/repo/build/shmvideo", "--device", "/dev/video0"]
    );
    Ok(())
}

#[tokio::test]
async fn run_launches_declared_artifact_quietly() -> TestResult {
    let mut viewer = ArtifactConfig::new("tools/viewer");
    viewer.default_input = Some("objects/scene.obj".to_string());
    viewer.env.insert("VIEWER_MODE".to_string(), "batch".to_string());
    let fx = Fixture::fresh(ConfigFileBuilder::new().with_artifact("viewer", viewer).build());

    let mut orch = fx.orchestrator();
    orch.invoke(cli_invocation(&["charm", "run", "viewer", "--quiet"])?)
        .await?;

    let runs = fx.journal.invocations();
    assert_eq!(runs[0].spec.argv(), &["ninja", "-j4", "tools/viewer"]);
    assert_eq!(
        runs[1].spec.argv(),
        &["/repo/build/tools/viewer", "/repo/objects/scene.obj"]
    );
    assert_eq!(runs[1].output, OutputMode::Silent);
    assert_eq!(runs[1].spec.env_overlay()["VIEWER_MODE"], "batch");
    assert_eq!(
        orch.report().state_of("run"),
        Some(charm::dag::TaskRunState::Succeeded)
    );
    Ok(())
}

#[tokio::test]
async fn run_with_unknown_artifact_runs_nothing() -> TestResult {
    let fx = Fixture::fresh(ConfigFileBuilder::new().build());

    let mut orch = fx.orchestrator();
    let result = orch.invoke(cli_invocation(&["charm", "run", "viewer"])?).await;

    assert!(matches!(result, Err(charm::errors::CharmError::ConfigError(_))));
    assert!(fx.journal.invocations().is_empty());
    Ok(())
}

fn flag_strategy() -> impl Strategy<Value = Vec<LaunchFlag>> {
    let flag = prop_oneof![
        Just(LaunchFlag::ShmVideo),
        Just(LaunchFlag::GenerateObjectTemplates),
        (1u16..5000).prop_map(|d| LaunchFlag::ZDistance(d.to_string())),
        "[a-z0-9/]{1,12}".prop_map(|p| LaunchFlag::Device(PathBuf::from(format!("/dev/{p}")))),
    ];
    proptest::collection::vec(flag, 0..5)
}

proptest! {
    #[test]
    fn shm_tokens_stay_adjacent_in_any_flag_combination(flags in flag_strategy()) {
        let fx = Fixture::fresh(ConfigFileBuilder::new().build());
        let launcher = Launcher::new(&fx.ctx, &fx.cfg.launch, &fx.cfg.artifact);

        let mut request = LaunchRequest::new("rbot");
        for flag in &flags {
            request = request.with_flag(flag.clone());
        }
        let spec = launcher.command(&request).unwrap();
        let argv = spec.argv();

        let wants_shm = flags.contains(&LaunchFlag::ShmVideo);
        let video = argv.iter().position(|a| a == "--video");
        prop_assert_eq!(video.is_some(), wants_shm);
        if let Some(i) = video {
            prop_assert_eq!(argv[i + 1].as_str(), "shm");
        }

        // Binary first, default object last, every flag exactly once.
        prop_assert_eq!(argv[0].as_str(), "/repo/build/rbot");
        prop_assert_eq!(argv[argv.len() - 1].as_str(), "/repo/objects/box.obj");
        let distinct: BTreeSet<LaunchFlag> = flags.into_iter().collect();
        let expected: usize = distinct.iter().map(|f| f.tokens().len()).sum();
        prop_assert_eq!(argv.len(), expected + 2);
    }
}
