use std::path::PathBuf;

use tetrist_evaluator::{engine::EngineConfig, scoring::ScoringKind};

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Scoring model whose default weights are written (simple, dellacherie)
    #[arg(long, default_value = "simple")]
    scoring: ScoringKind,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DefaultConfigArg) -> anyhow::Result<()> {
    let DefaultConfigArg { scoring, output } = arg;
    let config = EngineConfig {
        scoring: (*scoring).into(),
        ..EngineConfig::default()
    };
    Output::save_json(&config, output.clone())
}
