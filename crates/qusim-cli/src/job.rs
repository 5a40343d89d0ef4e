//! Job files: a circuit described in YAML or JSON.
//!
//! ```yaml
//! qubits: 2
//! state: [0, [0.6, 0.8]]
//! nodes:
//!   - gate: { key: 0, op: { name: H } }
//!   - gate: { key: [0, 1], op: { name: CNOT } }
//!   - gate: { key: 1, op: { name: Rx, angle: 0.5, transforms: [adjoint] } }
//!   - observer: { key: 0 }
//!   - classical_observer: { sites: [0, 1], opname: ZZ, name: parity }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use qusim_ir::{
    AutoReset, Circuit, Node, NodeSequence, OpArg, OpExpr, QState, QubitId, QubitKey, ops,
};

/// Top-level job description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    /// Number of qubits.
    pub qubits: usize,
    /// Initial value per qubit, by index. Missing entries stay 0.
    #[serde(default)]
    pub state: Vec<serde_json::Value>,
    /// Nodes in execution order.
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

/// One node of a job.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSpec {
    Gate {
        key: Option<QubitKey>,
        op: Option<OpSpec>,
    },
    Observer {
        key: Option<u32>,
        #[serde(default)]
        auto_reset: AutoReset,
        #[serde(default = "default_keep")]
        keep: u32,
    },
    ClassicalObserver {
        sites: Option<Vec<u32>>,
        opname: String,
        #[serde(default)]
        name: Option<String>,
    },
}

fn default_keep() -> u32 {
    1
}

/// Trailing transform applied to an operation.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    Transpose,
    Adjoint,
    Conj,
}

/// An operation expression.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpSpec {
    /// Standard operation name (`H`, `CNOT`, `Rx`, `CONTROL`, ...).
    pub name: String,
    /// Angle for parameterized operations.
    #[serde(default)]
    pub angle: Option<serde_json::Number>,
    /// Target operation for control operations.
    #[serde(default)]
    pub target: Option<Box<OpSpec>>,
    /// Operations composed after this one, in order.
    #[serde(default)]
    pub dot: Vec<OpSpec>,
    /// Transforms applied last, in order.
    #[serde(default)]
    pub transforms: Vec<Transform>,
}

impl OpSpec {
    /// Build the expression.
    pub fn build(&self) -> Result<OpExpr> {
        let mut op = ops::by_name(&self.name)
            .ok_or_else(|| anyhow::anyhow!("Unknown operation: '{}'", self.name))?;

        if let Some(angle) = &self.angle {
            let arg = match angle.as_i64() {
                Some(i) => OpArg::Int(i),
                None => OpArg::Real(angle.as_f64().unwrap_or(f64::NAN)),
            };
            op = op.call(arg)?;
        }
        if let Some(target) = &self.target {
            op = op.call(target.build()?)?;
        }
        for next in &self.dot {
            op = op.dot(&next.build()?);
        }
        for t in &self.transforms {
            op = match t {
                Transform::Transpose => op.transpose(),
                Transform::Adjoint => op.adjoint(),
                Transform::Conj => op.conj(),
            };
        }
        Ok(op)
    }
}

impl NodeSpec {
    /// Build the node.
    pub fn build(&self) -> Result<Node> {
        let node = match self {
            NodeSpec::Gate { key, op } => {
                let op = op.as_ref().map(OpSpec::build).transpose()?;
                Node::try_gate(key.clone(), op)?
            }
            NodeSpec::Observer {
                key,
                auto_reset,
                keep,
            } => Node::try_observer(key.map(QubitId), *auto_reset, *keep)?,
            NodeSpec::ClassicalObserver {
                sites,
                opname,
                name,
            } => Node::try_classical_observer(
                sites
                    .as_ref()
                    .map(|s| s.iter().copied().map(QubitId).collect()),
                opname.clone(),
                name.clone(),
            )?,
        };
        Ok(node)
    }
}

impl JobFile {
    /// Parse a job from YAML (JSON is accepted too, being a YAML subset).
    ///
    /// Node kinds are written as single-key maps (`- gate: {...}`), not YAML
    /// tags.
    pub fn parse(source: &str) -> Result<Self> {
        let de = serde_yaml_ng::Deserializer::from_str(source);
        serde_yaml_ng::with::singleton_map_recursive::deserialize(de)
            .map_err(|e| anyhow::anyhow!("Parse error: {e}"))
    }

    /// Load a job from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &str) -> Result<Self> {
        let path_obj = Path::new(path);

        if !path_obj.exists() {
            anyhow::bail!("File not found: {path}");
        }

        let source =
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

        let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");
        debug!("Loading job {} ({} bytes)", path, source.len());

        match ext.to_lowercase().as_str() {
            "json" => {
                serde_json::from_str(&source).map_err(|e| anyhow::anyhow!("Parse error: {e}"))
            }
            _ => Self::parse(&source),
        }
    }

    /// Write the declared initial values into `state`.
    pub fn apply_state(&self, state: &mut QState) -> Result<()> {
        for (index, value) in self.state.iter().enumerate() {
            state
                .set_json(index, value.clone())
                .with_context(|| format!("Invalid state for qubit {index}"))?;
        }
        Ok(())
    }

    /// Build the circuit, including its initial state.
    pub fn circuit(&self) -> Result<Circuit> {
        let mut circuit = Circuit::new(self.qubits);
        for (i, spec) in self.nodes.iter().enumerate() {
            let node = spec.build().with_context(|| format!("Invalid node #{i}"))?;
            circuit.push(node)?;
        }
        self.apply_state(circuit.state_mut())?;
        Ok(circuit)
    }
}
