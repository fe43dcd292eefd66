//! File-path templates and solver options for a model run.

use indexmap::IndexMap;
use std::path::PathBuf;

/// Solver options applied to every run unless overridden.
pub const DEFAULT_CPLEX_OPTIONS: &[(&str, &str)] = &[
    ("advind", "0"),
    ("lpmethod", "2"),
    ("threads", "4"),
    ("epopt", "1e-06"),
];

/// Option file the CPLEX solver picks up from the engine's working directory.
pub const SOLVER_OPTION_FILE: &str = "cplex.opt";

/// CPLEX options written to [`SOLVER_OPTION_FILE`] before each run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOptions(IndexMap<String, String>);

impl Default for SolverOptions {
    fn default() -> Self {
        Self(
            DEFAULT_CPLEX_OPTIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl SolverOptions {
    /// Overlay `overrides` on the current options, replacing existing keys
    /// and appending new ones.
    pub fn merge<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in overrides {
            self.0.insert(key.into(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// One `key = value` line per option, in insertion order.
    pub fn render(&self) -> String {
        let mut text = self
            .0
            .iter()
            .map(|(k, v)| format!("{k} = {v}"))
            .collect::<Vec<_>>()
            .join("\n");
        text.push('\n');
        text
    }
}

/// Run-level options for a GAMS model.
///
/// Path fields are templates: `{model_dir}`, `{model_name}` and `{case}` are
/// substituted first, after which `{in_file}` and `{out_file}` are available
/// to `solve_args`.
#[derive(Debug, Clone)]
pub struct ModelOptions {
    /// Directory holding the model source files.
    pub model_dir: PathBuf,
    /// Program file handed to the engine.
    pub model_file: String,
    /// Input data file the scenario is exported to.
    pub in_file: String,
    /// Output file the engine writes the solution to.
    pub out_file: String,
    /// Model-specific engine arguments (double-dash options).
    pub solve_args: Vec<String>,
    /// Engine-level arguments appended after `solve_args`.
    pub gams_args: Vec<String>,
    /// Explicit case id; derived from the scenario when absent.
    pub case: Option<String>,
    /// Run the engine in a scratch directory. Listing files and the solver
    /// option file then stay out of `model_dir`, so concurrent runs sharing
    /// a model directory do not collide.
    pub use_temp_dir: bool,
}

impl ModelOptions {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            model_file: template(&["{model_name}_run.gms"]),
            in_file: template(&["data", "MsgData_{case}.gdx"]),
            out_file: template(&["output", "MsgOutput_{case}.gdx"]),
            solve_args: vec![
                "--in={in_file}".into(),
                "--out={out_file}".into(),
                format!(
                    "--iter={}",
                    template(&["output", "MsgIterationReport_{case}.gdx"])
                ),
            ],
            gams_args: vec!["LogOption=4".into()],
            case: None,
            use_temp_dir: false,
        }
    }

    /// Derive the case id and substitute every template for a concrete run.
    pub fn resolve(
        &self,
        model_name: &str,
        scenario_model: &str,
        scenario_name: &str,
    ) -> ResolvedRun {
        let case = self
            .case
            .clone()
            .unwrap_or_else(|| case_id(scenario_model, scenario_name));
        let model_dir = self.model_dir.display().to_string();

        let subst = |t: &str| {
            t.replace("{model_dir}", &model_dir)
                .replace("{model_name}", model_name)
                .replace("{case}", &case)
        };

        let model_file = subst(&self.model_file);
        let in_file = subst(&self.in_file);
        let out_file = subst(&self.out_file);
        let args = self
            .solve_args
            .iter()
            .map(|arg| {
                subst(arg)
                    .replace("{in_file}", &in_file)
                    .replace("{out_file}", &out_file)
            })
            .chain(self.gams_args.iter().cloned())
            .collect();

        ResolvedRun {
            case,
            model_file: PathBuf::from(model_file),
            in_file: PathBuf::from(in_file),
            out_file: PathBuf::from(out_file),
            args,
        }
    }
}

/// [`ModelOptions`] with every template substituted.
#[derive(Debug, Clone)]
pub struct ResolvedRun {
    pub case: String,
    pub model_file: PathBuf,
    pub in_file: PathBuf,
    pub out_file: PathBuf,
    pub args: Vec<String>,
}

/// Case identifier for a scenario: `model_scenario` with path-hostile
/// characters replaced.
pub fn case_id(model: &str, scenario: &str) -> String {
    format!("{model}_{scenario}").replace([' ', '/'], "_")
}

/// Template string for a path under `{model_dir}`.
fn template(parts: &[&str]) -> String {
    let mut path = PathBuf::from("{model_dir}");
    path.extend(parts);
    path.display().to_string()
}
