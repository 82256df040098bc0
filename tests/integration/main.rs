//! Integration tests for cnbkit

mod scaffolding_tests {
    use cnbkit::buildplan::{BuildPlan, BuildPlanDependency};
    use cnbkit::layers::{LaunchMetadata, LayerFlags, Process};
    use cnbkit::testing::{
        assert_layer_flags, assert_layer_metadata, touch_file, write_file, BuildFactory,
        FixtureHasher, SyntheticHash,
    };

    #[test]
    fn untouched_descriptor_removed_touched_survives() {
        let mut factory = BuildFactory::new().unwrap();
        let layers = &mut factory.build_mut().layers;
        let first = touch_file(layers.root(), "test-layer-1.toml").unwrap();
        let second = touch_file(layers.root(), "test-layer-2.toml").unwrap();

        layers
            .layer("test-layer-1")
            .unwrap()
            .contribute(None::<&toml::Table>, |_| Ok(()), LayerFlags::default())
            .unwrap();
        layers.touched_layers().cleanup().unwrap();

        assert!(first.is_file());
        assert!(!second.exists());
    }

    #[test]
    fn buildpack_flow_end_to_end() {
        let mut factory = BuildFactory::new().unwrap();
        let fixture = factory.root().join("fixtures").join("stub-jdk.tar.gz");
        write_file(&fixture, "jdk").unwrap();
        factory.add_build_plan("openjdk-jdk", BuildPlanDependency::new("11.*"));
        let jdk = factory.add_dependency("openjdk-jdk", &fixture).unwrap();
        touch_file(factory.build().layers.root(), "from-last-build.toml").unwrap();

        // What a buildpack under test would do
        let build = factory.build_mut();
        assert!(build.build_plan.contains_key("openjdk-jdk"));
        let artifact = build.layers.cached_artifact(&jdk).unwrap().unwrap();
        let layer = build.layers.layer("openjdk-jdk").unwrap();
        layer
            .contribute(
                Some(&jdk),
                |layer| {
                    std::fs::copy(&artifact, layer.root().join("jdk.tar.gz"))
                        .map(|_| ())
                        .map_err(|e| cnbkit::KitError::io("installing jdk", e))
                },
                LayerFlags::new(true, true, false),
            )
            .unwrap();
        build
            .layers
            .write_metadata(&LaunchMetadata::new(vec![Process::new(
                "web",
                "java -jar app.jar",
            )]))
            .unwrap();
        let mut produced = BuildPlan::new();
        produced.insert("openjdk-jdk".to_string(), BuildPlanDependency::new("11.0.2"));
        assert_eq!(build.success(produced.clone()).unwrap(), 0);

        assert_layer_metadata(&layer, &jdk);
        assert_layer_flags(&layer, LayerFlags::new(true, true, false));
        assert_eq!(factory.output(), Some(produced));
        assert!(!factory
            .build()
            .layers
            .root()
            .join("from-last-build.toml")
            .exists());

        let log = factory.info_log();
        assert!(log.contains("openjdk-jdk: Contributing to layer"));
        assert!(log.contains("-----> Process types:"));
        assert!(log.contains("web: java -jar app.jar"));
    }

    #[test]
    fn synthetic_hash_names_cache_layer() {
        let mut factory = BuildFactory::new().unwrap();
        let fixture = factory.root().join("stub.tgz");
        write_file(&fixture, "").unwrap();

        let dependency = factory.add_dependency("test-id", &fixture).unwrap();

        assert_eq!(dependency.sha256, SyntheticHash.digest("test-id"));
        assert!(factory
            .build()
            .layers
            .root()
            .join(&dependency.sha256)
            .join("stub.tgz")
            .is_file());
    }
}

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use cnbkit::testing::{scratch_dir, touch_file, write_file};
    use predicates::prelude::*;

    fn cnbkit() -> Command {
        let mut cmd = cargo_bin_cmd!("cnbkit");
        cmd.env_remove("CNBKIT_CONFIG").env_remove("CLICOLOR_FORCE");
        cmd
    }

    #[test]
    fn help_displays() {
        cnbkit()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Layer bookkeeping"));
    }

    #[test]
    fn version_displays() {
        cnbkit()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("cnbkit"));
    }

    #[test]
    fn hash_prints_digest() {
        cnbkit()
            .args(["hash", ""])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            ));
    }

    #[test]
    fn cleanup_keeps_named_layers() {
        let dir = scratch_dir("cli").unwrap();
        let kept = touch_file(dir.path(), "kept.toml").unwrap();
        let stale = touch_file(dir.path(), "stale.toml").unwrap();

        cnbkit()
            .arg("cleanup")
            .arg(dir.path())
            .args(["--keep", "kept"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 1 descriptor(s)"));

        assert!(kept.exists());
        assert!(!stale.exists());
    }

    #[test]
    fn cleanup_dry_run_removes_nothing() {
        let dir = scratch_dir("cli").unwrap();
        let stale = touch_file(dir.path(), "stale.toml").unwrap();

        cnbkit()
            .arg("cleanup")
            .arg(dir.path())
            .arg("--dry-run")
            .assert()
            .success()
            .stdout(predicate::str::contains("Would remove"));

        assert!(stale.exists());
    }

    #[test]
    fn cleanup_rejects_bad_keep_name() {
        let dir = scratch_dir("cli").unwrap();

        cnbkit()
            .arg("cleanup")
            .arg(dir.path())
            .args(["--keep", "../etc"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid layer name"));
    }

    #[test]
    fn layers_lists_descriptors() {
        let dir = scratch_dir("cli").unwrap();
        write_file(dir.path().join("jdk.toml"), "launch = true\n[metadata]\nversion = \"11\"\n")
            .unwrap();
        touch_file(dir.path(), "empty.toml").unwrap();

        cnbkit()
            .arg("layers")
            .arg(dir.path())
            .args(["--format", "plain"])
            .assert()
            .success()
            .stdout("empty\njdk\n");

        cnbkit()
            .arg("layers")
            .arg(dir.path())
            .args(["--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"launch\": true"));
    }

    #[test]
    fn processes_aligns_types() {
        let dir = scratch_dir("cli").unwrap();
        let launch = dir.path().join("launch.toml");
        write_file(
            &launch,
            r#"
[[processes]]
type = "short"
command = "test-command-1"

[[processes]]
type = "a-very-long-type"
command = "test-command-2"
"#,
        )
        .unwrap();

        cnbkit()
            .arg("processes")
            .arg(&launch)
            .assert()
            .success()
            .stdout(predicate::str::contains("-----> Process types:"))
            .stdout(predicate::str::contains(concat!(
                "                  short: test-command-1\n",
                "       a-very-long-type: test-command-2\n",
            )));
    }

    #[test]
    fn processes_missing_file() {
        cnbkit()
            .args(["processes", "/nonexistent/launch.toml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("reading launch metadata"));
    }

    #[test]
    fn config_path_with_override() {
        let dir = scratch_dir("cli").unwrap();
        let path = dir.path().join("custom.toml");

        cnbkit()
            .arg("--config")
            .arg(&path)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn config_show() {
        let dir = scratch_dir("cli").unwrap();
        cnbkit()
            .arg("--config")
            .arg(dir.path().join("absent.toml"))
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[build]"))
            .stdout(predicate::str::contains("test-stack"));
    }
}
