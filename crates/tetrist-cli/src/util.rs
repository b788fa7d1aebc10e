use std::{
    fs::File,
    io::{self, BufWriter, Read as _, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use tetrist_engine::{Board, MAX_PIECE_SIZE};
use tetrist_evaluator::engine::EngineConfig;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Loads the engine configuration, falling back to the defaults when no file is given.
///
/// # Errors
///
/// Returns error if the file cannot be read or parsed, or if the board it describes is
/// smaller than the largest piece.
pub fn load_engine_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => read_json_file("engine config", path)?,
        None => EngineConfig::default(),
    };
    check_board_size(config.rows, config.cols)?;
    Ok(config)
}

pub fn check_board_size(rows: usize, cols: usize) -> anyhow::Result<()> {
    anyhow::ensure!(
        rows >= MAX_PIECE_SIZE && cols >= MAX_PIECE_SIZE,
        "board must be at least {MAX_PIECE_SIZE}x{MAX_PIECE_SIZE}, got {rows}x{cols}"
    );
    Ok(())
}

/// Reads a board in text form from `path`, or from stdin when no path is given.
///
/// # Errors
///
/// Returns error if the input cannot be read or does not hold a live board.
pub fn read_board(path: Option<&Path>) -> anyhow::Result<Board> {
    let (text, source) = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read board file: {}", path.display()))?;
            (text, path.display().to_string())
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read board from stdin")?;
            (text, "stdin".to_owned())
        }
    };
    parse_live_board(&text, &source)
}

fn parse_live_board(text: &str, source: &str) -> anyhow::Result<Board> {
    let board: Board = text
        .parse()
        .with_context(|| format!("Failed to parse board from {source}"))?;
    anyhow::ensure!(
        !board.is_invalid(),
        "board from {source} contains the invalid marker 'x'"
    );
    Ok(board)
}
