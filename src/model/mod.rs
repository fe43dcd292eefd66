//! Model variants and the execution wrapper around the GAMS engine.

pub mod options;

pub use options::{
    case_id, ModelOptions, ResolvedRun, SolverOptions, DEFAULT_CPLEX_OPTIONS, SOLVER_OPTION_FILE,
};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::{GamsEngine, GamsVersion};
use crate::error::ModelError;
use crate::platform::{initialize_items, PlatformError, Scenario};
use crate::schema::{macro_items_for_init, message_items};

/// The model variants this driver can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelVariant {
    Message,
    Macro,
    MessageMacro,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 3] = [
        ModelVariant::Message,
        ModelVariant::Macro,
        ModelVariant::MessageMacro,
    ];

    /// Published model name; also names the program file
    /// (`<name>_run.gms`).
    pub fn name(&self) -> &'static str {
        match self {
            ModelVariant::Message => "MESSAGE",
            ModelVariant::Macro => "MACRO",
            ModelVariant::MessageMacro => "MESSAGE-MACRO",
        }
    }

    /// Oldest engine release the variant's model source runs on. The MACRO
    /// source uses the GAMS `break` statement, first available in 24.8.1.
    pub fn min_gams_release(&self) -> Option<GamsVersion> {
        match self {
            ModelVariant::Message => None,
            ModelVariant::Macro | ModelVariant::MessageMacro => Some(GamsVersion::new(24, 8, 1)),
        }
    }

    /// Declare the variant's schema items on `scenario`. Items the scenario
    /// already holds are left untouched.
    pub fn initialize(&self, scenario: &mut dyn Scenario) -> Result<(), PlatformError> {
        match self {
            ModelVariant::Message => initialize_items(scenario, message_items()),
            ModelVariant::Macro | ModelVariant::MessageMacro => {
                initialize_items(scenario, &macro_items_for_init())
            }
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub case: String,
    pub in_file: PathBuf,
    pub out_file: PathBuf,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// A configured model: variant, engine handle, path templates and solver
/// options.
///
/// The solver option file is written into the engine's working directory
/// before each run and removed afterwards whether or not the run succeeded.
/// Two concurrent runs sharing a model directory contend for that file; set
/// `use_temp_dir` on the options when runs may overlap.
#[derive(Debug)]
pub struct GamsModel {
    variant: ModelVariant,
    options: ModelOptions,
    solver_options: SolverOptions,
    engine: GamsEngine,
}

impl GamsModel {
    pub fn new(variant: ModelVariant, config: &Config) -> Self {
        Self {
            variant,
            options: ModelOptions::new(&config.model.dir),
            solver_options: SolverOptions::default(),
            engine: GamsEngine::from_config(&config.engine),
        }
    }

    pub fn with_options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    /// Overlay solver options on the defaults.
    pub fn with_solver_options<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.solver_options = self.solver_options.merge(overrides);
        self
    }

    pub fn with_engine(mut self, engine: GamsEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    pub fn solver_options(&self) -> &SolverOptions {
        &self.solver_options
    }

    /// Solve `scenario` with the external engine.
    ///
    /// Exports the scenario to the input file, writes the solver option
    /// file, invokes the engine on the rendered program, and imports the
    /// solution. The option file is removed even when the engine fails.
    pub async fn run(&self, scenario: &mut dyn Scenario) -> Result<RunSummary, ModelError> {
        if let Some(required) = self.variant.min_gams_release() {
            let found = self.engine.release().await?;
            if found < required {
                return Err(ModelError::EngineTooOld {
                    model: self.variant.name(),
                    required,
                    found,
                });
            }
        }

        // The engine's cwd moves into the scratch directory, so a relative
        // model_dir must be pinned before templates are rendered.
        let mut options = self.options.clone();
        if options.use_temp_dir && options.model_dir.is_relative() {
            options.model_dir = std::env::current_dir()?.join(&options.model_dir);
        }

        let run = options.resolve(
            self.variant.name(),
            scenario.model_name(),
            scenario.scenario_name(),
        );
        let started_at = Utc::now();
        let clock = Instant::now();
        info!(model = self.variant.name(), case = %run.case, "starting model run");

        for file in [&run.in_file, &run.out_file] {
            if let Some(parent) = file.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        scenario.write_input(&run.in_file).await?;

        let scratch = if options.use_temp_dir {
            Some(tempfile::tempdir()?)
        } else {
            None
        };
        let workdir = scratch
            .as_ref()
            .map(|dir| dir.path().to_path_buf())
            .unwrap_or_else(|| options.model_dir.clone());

        let optfile = workdir.join(SOLVER_OPTION_FILE);
        tokio::fs::write(&optfile, self.solver_options.render()).await?;

        let result = self
            .engine
            .execute(&run.model_file, &run.args, &workdir)
            .await;

        // Remove the option file whether or not the engine succeeded.
        if let Err(err) = tokio::fs::remove_file(&optfile).await {
            warn!(file = %optfile.display(), %err, "could not remove solver option file");
        }

        result?;

        scenario.read_solution(&run.out_file).await?;

        let elapsed = clock.elapsed();
        info!(case = %run.case, ?elapsed, "model run finished");
        Ok(RunSummary {
            case: run.case,
            in_file: run.in_file,
            out_file: run.out_file,
            started_at,
            elapsed,
        })
    }

    /// Version stamped in the model source (`version.gms` under the model
    /// directory).
    pub async fn source_version(&self) -> Result<GamsVersion, ModelError> {
        source_version(&self.options.model_dir).await
    }
}

static VERSION_MARKERS: Lazy<[Regex; 3]> = Lazy::new(|| {
    ["MAJOR", "MINOR", "PATCH"].map(|part| {
        Regex::new(&format!(r#"VERSION_{part} "(.+?)""#)).expect("valid regex")
    })
});

/// Read the model source version from `version.gms` in `model_dir`.
pub async fn source_version(model_dir: &Path) -> Result<GamsVersion, ModelError> {
    let path = model_dir.join("version.gms");
    let text = tokio::fs::read_to_string(&path).await?;

    let mut parts = [0u32; 3];
    for (part, marker) in parts.iter_mut().zip(VERSION_MARKERS.iter()) {
        let capture = marker
            .captures(&text)
            .and_then(|c| c.get(1))
            .ok_or_else(|| ModelError::SourceVersion(path.clone()))?;
        *part = capture
            .as_str()
            .parse()
            .map_err(|_| ModelError::VersionParse(capture.as_str().to_string()))?;
    }
    Ok(GamsVersion::new(parts[0], parts[1], parts[2]))
}
