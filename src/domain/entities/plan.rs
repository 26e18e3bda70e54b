//! Deployment plan entity
//!
//! Describes the fixed artifact suite as an explicit dependency graph: which
//! artifacts exist, what their constructors take, and which configuration
//! calls wire them together after creation. The hand-written order is
//! validated to be a topological order of the declared dependencies, so the
//! DAG stays inspectable and testable independent of the call sequence.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use crate::domain::entities::Manifest;
use crate::domain::value_objects::Address;

/// A constructor or configuration-call argument.
///
/// `AddressOf` is resolved against the manifest late, at provision/wiring
/// time, because the referenced address only exists once the dependency has
/// been provisioned.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgSpec {
    /// Literal value passed through unchanged
    Lit(Value),
    /// Address of a previously provisioned artifact
    AddressOf(String),
}

impl ArgSpec {
    pub fn lit(value: impl Into<Value>) -> Self {
        Self::Lit(value.into())
    }

    /// Literal address known at plan-build time (externals, config constants).
    pub fn address(address: Address) -> Self {
        Self::Lit(Value::String(address.to_string()))
    }

    pub fn of(name: impl Into<String>) -> Self {
        Self::AddressOf(name.into())
    }
}

/// Resolve argument specs against the manifest.
///
/// Fails only if a referenced artifact has not been provisioned yet, which a
/// validated plan rules out by construction.
pub fn resolve_args(args: &[ArgSpec], manifest: &Manifest) -> Result<Vec<Value>, PlanError> {
    args.iter()
        .map(|arg| match arg {
            ArgSpec::Lit(value) => Ok(value.clone()),
            ArgSpec::AddressOf(name) => manifest
                .address_of(name)
                .map(|a| Value::String(a.to_string()))
                .ok_or_else(|| PlanError::UnresolvedAddress { name: name.clone() }),
        })
        .collect()
}

/// One artifact to provision: logical name, code to create it from,
/// constructor arguments and the artifacts it depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSpec {
    pub name: String,
    pub code_id: String,
    pub constructor: Vec<ArgSpec>,
    pub deps: Vec<String>,
}

impl ArtifactSpec {
    pub fn new(name: impl Into<String>, code_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code_id: code_id.into(),
            constructor: Vec::new(),
            deps: Vec::new(),
        }
    }

    pub fn constructor(mut self, args: Vec<ArgSpec>) -> Self {
        self.constructor = args;
        self
    }

    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// One post-creation configuration call against a provisioned artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct WiringCall {
    pub target: String,
    pub method: String,
    pub args: Vec<ArgSpec>,
}

impl WiringCall {
    pub fn new(target: impl Into<String>, method: impl Into<String>, args: Vec<ArgSpec>) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
            args,
        }
    }
}

/// The full deployment plan, split into the orchestrator's phases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeployPlan {
    /// Core protocol artifacts, in deployment order
    pub core: Vec<ArtifactSpec>,
    /// Auxiliary artifacts (liquidity incentives)
    pub auxiliary: Vec<ArtifactSpec>,
    /// Governance token cluster
    pub token: Vec<ArtifactSpec>,
    /// Read-only helpers, provisioned after wiring
    pub lens: Vec<ArtifactSpec>,
    pub wire_core: Vec<WiringCall>,
    pub wire_token: Vec<WiringCall>,
    pub wire_token_to_core: Vec<WiringCall>,
}

impl DeployPlan {
    /// All artifacts in the order they are provisioned.
    pub fn provisioning_order<'a>(&'a self) -> impl Iterator<Item = &'a ArtifactSpec> + 'a {
        self.core
            .iter()
            .chain(&self.auxiliary)
            .chain(&self.token)
            .chain(&self.lens)
    }

    /// All wiring calls in the order they are issued.
    pub fn wiring_order<'a>(&'a self) -> impl Iterator<Item = &'a WiringCall> + 'a {
        self.wire_core
            .iter()
            .chain(&self.wire_token)
            .chain(&self.wire_token_to_core)
    }

    /// Check that the hand-written sequence is consistent with the declared
    /// dependency graph: unique names, every dependency provisioned earlier,
    /// constructor references covered by declared dependencies, and wiring
    /// that only touches artifacts provisioned before the wiring phases.
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();

        for spec in self.provisioning_order() {
            if !seen.insert(spec.name.as_str()) {
                return Err(PlanError::DuplicateName {
                    name: spec.name.clone(),
                });
            }
            for dep in &spec.deps {
                if !seen.contains(dep.as_str()) {
                    return Err(PlanError::DependencyNotProvisioned {
                        artifact: spec.name.clone(),
                        dep: dep.clone(),
                    });
                }
            }
            for arg in &spec.constructor {
                if let ArgSpec::AddressOf(referenced) = arg {
                    if !spec.deps.contains(referenced) {
                        return Err(PlanError::UndeclaredConstructorRef {
                            artifact: spec.name.clone(),
                            referenced: referenced.clone(),
                        });
                    }
                }
            }
        }

        // Wiring runs after core, auxiliary and token provisioning but before
        // the lens phase, so lens artifacts are not addressable from wiring.
        let wired: BTreeSet<&str> = self
            .core
            .iter()
            .chain(&self.auxiliary)
            .chain(&self.token)
            .map(|s| s.name.as_str())
            .collect();

        for call in self.wiring_order() {
            if !wired.contains(call.target.as_str()) {
                return Err(PlanError::UnknownWiringTarget {
                    target: call.target.clone(),
                    method: call.method.clone(),
                });
            }
            for arg in &call.args {
                if let ArgSpec::AddressOf(referenced) = arg {
                    if !wired.contains(referenced.as_str()) {
                        return Err(PlanError::UnknownWiringRef {
                            target: call.target.clone(),
                            referenced: referenced.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Plan construction/validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    DuplicateName {
        name: String,
    },
    DependencyNotProvisioned {
        artifact: String,
        dep: String,
    },
    UndeclaredConstructorRef {
        artifact: String,
        referenced: String,
    },
    UnknownWiringTarget {
        target: String,
        method: String,
    },
    UnknownWiringRef {
        target: String,
        referenced: String,
    },
    UnresolvedAddress {
        name: String,
    },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => {
                write!(f, "artifact '{name}' appears more than once in the plan")
            }
            Self::DependencyNotProvisioned { artifact, dep } => {
                write!(f, "artifact '{artifact}' depends on '{dep}', which is provisioned later or not at all")
            }
            Self::UndeclaredConstructorRef { artifact, referenced } => {
                write!(f, "constructor of '{artifact}' references '{referenced}' without declaring it as a dependency")
            }
            Self::UnknownWiringTarget { target, method } => {
                write!(f, "wiring call {target}.{method} targets an unknown artifact")
            }
            Self::UnknownWiringRef { target, referenced } => {
                write!(f, "wiring call against '{target}' references unknown artifact '{referenced}'")
            }
            Self::UnresolvedAddress { name } => {
                write!(f, "address of '{name}' is not in the manifest yet")
            }
        }
    }
}

impl std::error::Error for PlanError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ArtifactRecord;
    use crate::domain::value_objects::TxHash;

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::from_bytes(bytes)
    }

    fn tx(n: u8) -> TxHash {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        TxHash::from_bytes(bytes)
    }

    fn two_artifact_plan() -> DeployPlan {
        DeployPlan {
            core: vec![
                ArtifactSpec::new("alpha", "alpha"),
                ArtifactSpec::new("beta", "beta")
                    .constructor(vec![ArgSpec::of("alpha")])
                    .depends_on(["alpha"]),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn valid_plan_passes() {
        assert!(two_artifact_plan().validate().is_ok());
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut plan = two_artifact_plan();
        plan.auxiliary.push(ArtifactSpec::new("alpha", "alpha"));
        assert_eq!(
            plan.validate(),
            Err(PlanError::DuplicateName {
                name: "alpha".into()
            })
        );
    }

    #[test]
    fn forward_dependency_rejected() {
        let plan = DeployPlan {
            core: vec![
                ArtifactSpec::new("beta", "beta").depends_on(["alpha"]),
                ArtifactSpec::new("alpha", "alpha"),
            ],
            ..Default::default()
        };
        assert!(matches!(
            plan.validate(),
            Err(PlanError::DependencyNotProvisioned { .. })
        ));
    }

    #[test]
    fn undeclared_constructor_ref_rejected() {
        let plan = DeployPlan {
            core: vec![
                ArtifactSpec::new("alpha", "alpha"),
                ArtifactSpec::new("beta", "beta").constructor(vec![ArgSpec::of("alpha")]),
            ],
            ..Default::default()
        };
        assert!(matches!(
            plan.validate(),
            Err(PlanError::UndeclaredConstructorRef { .. })
        ));
    }

    #[test]
    fn wiring_against_unknown_target_rejected() {
        let mut plan = two_artifact_plan();
        plan.wire_core
            .push(WiringCall::new("gamma", "setAddresses", vec![]));
        assert!(matches!(
            plan.validate(),
            Err(PlanError::UnknownWiringTarget { .. })
        ));
    }

    #[test]
    fn wiring_cannot_reference_lens_artifacts() {
        let mut plan = two_artifact_plan();
        plan.lens.push(ArtifactSpec::new("lens", "lens"));
        plan.wire_core.push(WiringCall::new(
            "alpha",
            "setAddresses",
            vec![ArgSpec::of("lens")],
        ));
        assert!(matches!(
            plan.validate(),
            Err(PlanError::UnknownWiringRef { .. })
        ));
    }

    #[test]
    fn resolve_args_substitutes_manifest_addresses() {
        let mut manifest = Manifest::new();
        manifest.insert_artifact("alpha", ArtifactRecord::new(addr(7), tx(7)));

        let resolved = resolve_args(
            &[ArgSpec::lit(42u64), ArgSpec::of("alpha")],
            &manifest,
        )
        .unwrap();

        assert_eq!(resolved[0], Value::from(42u64));
        assert_eq!(resolved[1], Value::String(addr(7).to_string()));
    }

    #[test]
    fn resolve_args_fails_for_missing_artifact() {
        let manifest = Manifest::new();
        assert_eq!(
            resolve_args(&[ArgSpec::of("alpha")], &manifest),
            Err(PlanError::UnresolvedAddress {
                name: "alpha".into()
            })
        );
    }
}
