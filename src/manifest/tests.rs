//! Tests for manifest module

#[cfg(test)]
mod tests {
    use serde_yaml::Value;

    use crate::error::StevedoreError;
    use crate::manifest::{
        Manifest, MixinDeclaration, OutputDefinition, ParameterDefinition, ParameterSource,
        RequiredExtension, Schema,
    };

    const SIMPLE: &str = r#"
name: hello
description: An example stevedore configuration
version: 0.1.0
tag: getstevedore/stevedore-hello:v0.1.0

mixins:
- exec

install:
- exec:
    description: Install Hello World
    command: bash
    arguments:
    - -c
    - echo Hello World

uninstall:
- exec:
    description: Uninstall Hello World
    command: bash
    arguments:
    - -c
    - echo Goodbye World

status:
- exec:
    description: Get World Status
    command: bash
    arguments:
    - -c
    - echo The world is status quo
"#;

    const TEMPLATED: &str = r#"
name: hello
version: 0.1.0
tag: getstevedore/stevedore-hello:v0.1.0

mixins:
- exec

dependencies:
- name: mysql
  tag: getstevedore/azure-mysql:5.7

install:
- exec:
    description: Make a connection string
    command: bash
    arguments:
    - -c
    - echo '{{ bundle.dependencies.mysql.outputs.mysql-password }}'
- exec:
    description: Say the message
    command: bash
    arguments:
    - -c
    - echo '{{ bundle.outputs.msg }}'

uninstall:
- exec:
    description: Say goodbye
    command: bash
    arguments:
    - -c
    - echo goodbye '{{ bundle.outputs.name }}'

outputs:
- name: msg
  type: string
  path: /app/outputs/msg
"#;

    #[test]
    fn test_load_manifest() {
        let m = Manifest::load(SIMPLE).unwrap();

        assert_eq!(m.name, "hello");
        assert_eq!(m.description, "An example stevedore configuration");
        assert_eq!(m.version, "0.1.0");
        assert_eq!(m.bundle_tag, "getstevedore/stevedore-hello:v0.1.0");

        assert_eq!(m.mixins, vec![MixinDeclaration::new("exec")]);
        assert_eq!(m.install.len(), 1);

        let install_step = &m.install.steps[0];
        assert_eq!(
            install_step.description(),
            Some("Install Hello World".to_string())
        );
        assert_eq!(install_step.mixin_name(), Some("exec"));

        assert_eq!(m.custom_actions.len(), 1);
        assert!(m.custom_actions.contains_key("status"));

        let status_step = &m.custom_actions["status"].steps[0];
        assert_eq!(
            status_step.description(),
            Some("Get World Status".to_string())
        );
        assert_eq!(status_step.mixin_name(), Some("exec"));
    }

    #[test]
    fn test_load_manifest_deprecated_fields() {
        let yaml = r#"
name: hello
version: 0.1.0
invocationImage: getstevedore/hello-installer:v0.1.0
mixins:
- exec
install:
- exec:
    command: bash
uninstall:
- exec:
    command: bash
"#;
        let m = Manifest::load(yaml).unwrap();
        assert_eq!(m.image, "getstevedore/hello-installer:v0.1.0");
    }

    #[test]
    fn test_load_manifest_with_dependencies_in_order() {
        let yaml = r#"
name: hello
version: 0.1.0
mixins:
- exec
dependencies:
- name: nginx
  tag: localhost:5000/nginx:1.19
- name: mysql
  tag: getstevedore/azure-mysql:5.7
  parameters:
    database_name: wordpress
install:
- exec:
    command: bash
uninstall:
- exec:
    command: bash
"#;
        let m = Manifest::load(yaml).unwrap();

        let nginx = &m.dependencies[0];
        assert_eq!(nginx.name, "nginx");
        assert_eq!(nginx.tag, "localhost:5000/nginx:1.19");

        let mysql = &m.dependencies[1];
        assert_eq!(mysql.name, "mysql");
        assert_eq!(mysql.tag, "getstevedore/azure-mysql:5.7");
        assert_eq!(mysql.parameters.len(), 1);
    }

    #[test]
    fn test_action_validate_require_mixin_declaration() {
        let mut m = Manifest::load(SIMPLE).unwrap();

        // Sabotage!
        m.mixins = Vec::new();

        let err = m.install.validate(&m).unwrap_err();
        assert_eq!(err.to_string(), "mixin (exec) was not declared");
    }

    #[test]
    fn test_action_validate_require_mixin_data() {
        let mut m = Manifest::load(SIMPLE).unwrap();

        // Sabotage!
        m.install.steps[0].data = None;

        let err = m.install.validate(&m).unwrap_err();
        assert_eq!(err.to_string(), "no mixin specified");
    }

    #[test]
    fn test_action_validate_require_single_mixin_data() {
        let mut m = Manifest::load(SIMPLE).unwrap();

        // Sabotage!
        m.install.steps[0]
            .data
            .as_mut()
            .unwrap()
            .insert("rando-mixin".to_string(), Value::Null);

        let err = m.install.validate(&m).unwrap_err();
        assert_eq!(err.to_string(), "more than one mixin specified");
    }

    #[test]
    fn test_manifest_empty_steps() {
        let yaml = r#"
name: empty
version: 0.1.0
mixins:
- exec
install:
uninstall:
status:
"#;
        let err = Manifest::load(yaml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "3 errors occurred:\n\t* validation of action \"install\" failed: found an empty step\n\t* validation of action \"uninstall\" failed: found an empty step\n\t* validation of action \"status\" failed: found an empty step\n\n"
        );
    }

    #[test]
    fn test_manifest_validate_dockerfile() {
        let mut m = Manifest::load(SIMPLE).unwrap();

        m.dockerfile = "Dockerfile".to_string();

        let err = m.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dockerfile template cannot be named 'Dockerfile' because that is the filename generated during stevedore build"
        );
    }

    #[test]
    fn test_manifest_validate_version() {
        let mut m = Manifest::load(SIMPLE).unwrap();

        m.version = "not-a-version".to_string();

        let err = m.validate().unwrap_err();
        assert!(err.to_string().contains("invalid semantic version not-a-version"));
    }

    #[test]
    fn test_manifest_validate_aggregates_across_rules() {
        let mut m = Manifest::load(SIMPLE).unwrap();

        m.dockerfile = "Dockerfile".to_string();
        m.outputs.push(OutputDefinition {
            name: "msg".to_string(),
            ..OutputDefinition::default()
        });

        let message = m.validate().unwrap_err().to_string();
        assert!(message.starts_with("2 errors occurred:"));
        assert!(message.contains("\t* Dockerfile template cannot be named"));
        assert!(message.contains("\t* no path supplied for output msg"));
    }

    #[test]
    fn test_set_defaults_with_tag_set() {
        let mut m = Manifest {
            version: "1.2.3-beta.1".to_string(),
            bundle_tag: "getstevedore/mybun:v1.2.3".to_string(),
            ..Manifest::default()
        };

        m.set_defaults().unwrap();
        assert_eq!(m.bundle_tag, "getstevedore/mybun:v1.2.3");
        assert_eq!(m.image, "getstevedore/mybun-installer:v1.2.3");
    }

    #[test]
    fn test_set_defaults_without_tag() {
        let mut m = Manifest {
            version: "1.2.3-beta.1".to_string(),
            bundle_tag: "getstevedore/mybun".to_string(),
            ..Manifest::default()
        };

        m.set_defaults().unwrap();
        assert_eq!(m.bundle_tag, "getstevedore/mybun:v1.2.3-beta.1");
        assert_eq!(m.image, "getstevedore/mybun-installer:v1.2.3-beta.1");
    }

    #[test]
    fn test_set_defaults_registry_with_port() {
        let mut m = Manifest {
            version: "0.1.0".to_string(),
            bundle_tag: "localhost:5000/missing-invocation-image".to_string(),
            ..Manifest::default()
        };

        m.set_defaults().unwrap();
        assert_eq!(m.bundle_tag, "localhost:5000/missing-invocation-image:v0.1.0");
        assert_eq!(
            m.image,
            "localhost:5000/missing-invocation-image-installer:v0.1.0"
        );
    }

    #[test]
    fn test_set_defaults_is_idempotent() {
        let mut m = Manifest {
            version: "0.1.0".to_string(),
            bundle_tag: "getstevedore/mybun".to_string(),
            ..Manifest::default()
        };

        m.set_defaults().unwrap();
        let first = m.clone();
        m.set_defaults().unwrap();
        assert_eq!(m, first);
    }

    #[test]
    fn test_set_defaults_rejects_malformed_tag() {
        let mut m = Manifest {
            version: "0.1.0".to_string(),
            bundle_tag: "getstevedore//mybun".to_string(),
            ..Manifest::default()
        };

        assert!(matches!(
            m.set_defaults().unwrap_err(),
            StevedoreError::InvalidImageReference { .. }
        ));
    }

    #[test]
    fn test_mixin_declaration_unmarshal() {
        let yaml = r#"
mixins:
- exec
- az:
    extensions:
    - iot
"#;
        let m = Manifest::unmarshal(yaml).unwrap();

        assert_eq!(m.mixins.len(), 2, "expected 2 mixins");
        assert_eq!(m.mixins[0].name, "exec");
        assert_eq!(m.mixins[0].config, None);
        assert_eq!(m.mixins[1].name, "az");

        let want_config: Value = serde_yaml::from_str("extensions:\n- iot").unwrap();
        assert_eq!(m.mixins[1].config, Some(want_config));
    }

    #[test]
    fn test_mixin_declaration_unmarshal_invalid() {
        let yaml = r#"
mixins:
- exec:
    key: value
  az:
    extensions:
    - iot
"#;
        let err = Manifest::unmarshal(yaml).unwrap_err();
        assert!(
            err.to_string()
                .contains("mixin declaration contained more than one mixin")
        );
    }

    #[test]
    fn test_mixin_declaration_round_trip() {
        let config: Value = serde_yaml::from_str("extensions:\n- iot").unwrap();
        let mixins = vec![
            MixinDeclaration::new("exec"),
            MixinDeclaration::with_config("az", config),
        ];

        let encoded = serde_yaml::to_string(&mixins).unwrap();
        let decoded: Vec<MixinDeclaration> = serde_yaml::from_str(&encoded).unwrap();
        assert_eq!(decoded, mixins);

        let reencoded = serde_yaml::to_string(&decoded).unwrap();
        assert_eq!(reencoded, encoded);
    }

    #[test]
    fn test_credentials_unmarshal_all_required() {
        let yaml = r#"
name: hello
version: 0.1.0
mixins:
- exec
credentials:
- name: kubeconfig
  path: /root/.kube/config
- name: github-token
  env: GITHUB_TOKEN
  required: false
install:
- exec:
    command: bash
uninstall:
- exec:
    command: bash
"#;
        let m = Manifest::load(yaml).unwrap();

        assert_eq!(m.credentials.len(), 2);
        for cred in &m.credentials {
            assert!(cred.required, "credential {} should be required", cred.name);
        }
        assert_eq!(
            m.credentials[0].destination.path.as_deref(),
            Some("/root/.kube/config")
        );
        assert_eq!(
            m.credentials[1].destination.env.as_deref(),
            Some("GITHUB_TOKEN")
        );
    }

    #[test]
    fn test_load_manifest_with_custom_data() {
        let yaml = r#"
name: hello
version: 0.1.0
mixins:
- exec
foo: bar
install:
- exec:
    command: bash
uninstall:
- exec:
    command: bash
"#;
        let m = Manifest::load(yaml).unwrap();

        assert_eq!(m.custom.len(), 1);
        assert_eq!(m.custom.get("foo"), Some(&Value::from("bar")));
    }

    #[test]
    fn test_load_manifest_with_required_extensions() {
        let yaml = r#"
name: hello
version: 0.1.0
mixins:
- exec
required:
- requiredExtension1
- requiredExtension2:
    config: true
install:
- exec:
    command: bash
uninstall:
- exec:
    command: bash
"#;
        let m = Manifest::load(yaml).unwrap();

        let mut with_config = RequiredExtension::new("requiredExtension2");
        with_config.config = Some(
            [("config".to_string(), Value::from(true))]
                .into_iter()
                .collect(),
        );
        let expected = vec![RequiredExtension::new("requiredExtension1"), with_config];
        assert_eq!(m.required, expected);
    }

    #[test]
    fn test_unmarshal_with_template_variables() {
        let m = Manifest::unmarshal(TEMPLATED).unwrap();
        assert_eq!(
            m.template_variables,
            vec![
                "bundle.dependencies.mysql.outputs.mysql-password",
                "bundle.outputs.msg",
                "bundle.outputs.name",
            ]
        );
    }

    #[test]
    fn test_get_templated_outputs() {
        let m = Manifest::unmarshal(TEMPLATED).unwrap();

        let outputs = m.get_templated_outputs();

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs["msg"].name, "msg");
    }

    #[test]
    fn test_get_templated_dependency_outputs() {
        let m = Manifest::unmarshal(TEMPLATED).unwrap();

        let outputs = m.get_templated_dependency_outputs();

        assert_eq!(outputs.len(), 1);
        let reference = &outputs["mysql.mysql-password"];
        assert_eq!(reference.dependency, "mysql");
        assert_eq!(reference.output, "mysql-password");
    }

    #[test]
    fn test_validate_parameter_definition() {
        let mut pd = ParameterDefinition {
            name: "myparam".to_string(),
            schema: Schema {
                schema_type: Some("file".to_string()),
                ..Schema::default()
            },
            ..ParameterDefinition::default()
        };

        let err = pd.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "no destination path supplied for parameter myparam"
        );

        pd.destination.path = Some("/path/to/file".to_string());
        assert!(pd.validate().is_ok());
    }

    #[test]
    fn test_get_action_names() {
        let m = Manifest::load(SIMPLE).unwrap();
        assert_eq!(m.get_action_names(), vec!["install", "status", "uninstall"]);
    }

    #[test]
    fn test_get_action() {
        let m = Manifest::load(SIMPLE).unwrap();
        assert!(m.get_action("install").is_some());
        assert!(m.get_action("status").is_some());
        assert!(m.get_action("upgrade").is_some());
        assert!(m.get_action("rollback").is_none());
    }

    #[test]
    fn test_parameter_definition_update_apply_to() {
        let m = Manifest::load(SIMPLE).unwrap();

        struct Testcase {
            name: &'static str,
            default_value: Option<Value>,
            apply_to: Vec<String>,
            source: ParameterSource,
            want_apply_to: Vec<String>,
        }

        let testcases = vec![
            Testcase {
                name: "no source",
                default_value: None,
                apply_to: vec![],
                source: ParameterSource::default(),
                want_apply_to: vec![],
            },
            Testcase {
                name: "has default",
                default_value: Some(Value::from("myparam")),
                apply_to: vec![],
                source: ParameterSource {
                    output: Some("myoutput".to_string()),
                    ..ParameterSource::default()
                },
                want_apply_to: vec![],
            },
            Testcase {
                name: "has applyTo",
                default_value: None,
                apply_to: vec!["status".to_string()],
                source: ParameterSource {
                    output: Some("myoutput".to_string()),
                    ..ParameterSource::default()
                },
                want_apply_to: vec!["status".to_string()],
            },
            Testcase {
                name: "no default, no applyTo",
                default_value: None,
                apply_to: vec![],
                source: ParameterSource {
                    output: Some("myoutput".to_string()),
                    ..ParameterSource::default()
                },
                want_apply_to: vec!["status".to_string(), "uninstall".to_string()],
            },
        ];

        for tc in testcases {
            let mut pd = ParameterDefinition {
                name: "myparam".to_string(),
                schema: Schema {
                    schema_type: Some("file".to_string()),
                    default: tc.default_value,
                    ..Schema::default()
                },
                source: tc.source,
                apply_to: tc.apply_to,
                ..ParameterDefinition::default()
            };

            pd.update_apply_to(&m);
            assert_eq!(pd.apply_to, tc.want_apply_to, "{}", tc.name);
        }
    }
}
