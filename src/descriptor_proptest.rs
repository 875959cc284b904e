//! Property-based tests for the descriptor rewriting passes.
//!
//! These tests use proptest to generate random descriptor shapes and
//! verify that the resource-name uniqueness invariant holds for all
//! possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::descriptor::{ApplicationColor, DeploymentDescriptor, Module, Properties, Resource};
    use crate::error::Error;
    use crate::passes::blue_green;
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;

    fn container(name: &str) -> Resource {
        Resource {
            name: name.to_string(),
            r#type: Some("hdi-container".to_string()),
            properties: Properties::new(),
            description: None,
            groups: Vec::new(),
        }
    }

    fn zdm_deployer(name: &str, data: &str) -> Module {
        let mut properties = Properties::new();
        properties.insert("zdm-mode".to_string(), serde_json::Value::Bool(true));
        Module {
            name: name.to_string(),
            r#type: "hdi".to_string(),
            requires: vec![data.to_string()],
            properties,
        }
    }

    fn descriptor_with(modules: Vec<Module>, resources: Vec<Resource>) -> DeploymentDescriptor {
        DeploymentDescriptor {
            schema_version: "3.1".to_string(),
            id: "proptest".to_string(),
            version: "1.0.0".to_string(),
            properties: Properties::new(),
            modules,
            resources,
        }
    }

    proptest! {
        /// Property: after the blue/green pass, resource names are unique —
        /// or the pass failed on a name collision, never silently produced
        /// duplicates.
        #[test]
        fn blue_green_keeps_resource_names_unique(
            data in "[a-z][a-z0-9-]{0,12}",
            extra in proptest::collection::vec("[a-z][a-z0-9-]{0,12}", 0..4),
        ) {
            let mut resources = vec![container(&data)];
            for name in &extra {
                if name != &data {
                    resources.push(container(name));
                }
            }
            // Duplicate author names are rejected at parse time, so dedup
            // what the generator produced.
            let mut seen = std::collections::HashSet::new();
            resources.retain(|r| seen.insert(r.name.clone()));

            let descriptor = descriptor_with(
                vec![zdm_deployer("deployer", &data)],
                resources,
            );

            match blue_green::execute(descriptor, ApplicationColor::Blue, None) {
                Ok(resolved) => {
                    let mut names = std::collections::HashSet::new();
                    for resource in &resolved.resources {
                        prop_assert!(
                            names.insert(resource.name.clone()),
                            "duplicate resource name '{}' survived the pass",
                            resource.name
                        );
                    }
                }
                Err(Error::DuplicateResourceName { .. }) => {
                    // A generated name collided with a synthesized
                    // container name; failing is the required behavior.
                }
                Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
            }
        }

        /// Property: the pass is deterministic — same descriptor, same
        /// result.
        #[test]
        fn blue_green_is_deterministic(data in "[a-z][a-z0-9-]{0,12}") {
            let build = || descriptor_with(
                vec![zdm_deployer("deployer", &data)],
                vec![container(&data)],
            );

            let once = blue_green::execute(build(), ApplicationColor::Green, None);
            let twice = blue_green::execute(build(), ApplicationColor::Green, None);
            match (once, twice) {
                (Ok(a), Ok(b)) => {
                    prop_assert_eq!(a.to_yaml().unwrap(), b.to_yaml().unwrap());
                }
                (Err(_), Err(_)) => {}
                _ => return Err(TestCaseError::fail("non-deterministic outcome".to_string())),
            }
        }
    }
}
