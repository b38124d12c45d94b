// Licensed under MIT. See LICENSE for details.

//! One input in, one artifact out: parsing, AST construction, lowering and
//! serialization glued together, plus the file-based jobs around them.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::Config;
use crate::error::{AstError, JobError, PipelineError};
use crate::keymaerax::{serialize, ArchiveFormatter, IdGenerator, UuidGenerator};
use crate::lowering::RelDlToDlLowering;
use crate::parser::parse;
use crate::state::SideIdentifiers;
use crate::tree::{walk, ParseTreeListener};
use crate::types::{AstNode, Dialect, Ident};
use crate::visitor::{DlTreeVisitor, RelDlTreeVisitor};

/// Cuts `input` to at most `max` characters for log output, marking the cut
/// with "...".
pub fn format_input_for_logging(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        return String::from(input);
    }
    let kept: String = input.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[derive(Clone, Debug, PartialEq)]
pub struct DlAst {
    pub root: AstNode,
    pub identifiers: BTreeSet<Ident>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RelDlAst {
    pub root: AstNode,
    pub identifiers: SideIdentifiers,
}

// Parses `source` and walks the tree with `listener`. Nothing is walked if
// lexing or parsing reported a single error.
fn build<L>(dialect: Dialect, source: &str, mut listener: L) -> Result<L, PipelineError>
where
    L: ParseTreeListener<Error = AstError>,
{
    let parsed = parse(dialect, source);
    if parsed.has_errors() {
        let err = PipelineError::Syntax {
            dialect: dialect.name(),
            lexer_errors: parsed.lexer_errors.len(),
            parser_errors: parsed.parser_errors.len(),
        };
        tracing::error!("{}", err);
        return Err(err);
    }

    let tree = parsed.tree.ok_or(PipelineError::EmptyAst)?;
    walk(&mut listener, &tree).map_err(|source| {
        tracing::error!("AST construction for the {} failed: {}", dialect, source);
        PipelineError::Construction {
            dialect: dialect.name(),
            source,
        }
    })?;
    Ok(listener)
}

pub fn generate_dl_ast(source: &str) -> Result<DlAst, PipelineError> {
    let (root, identifiers) = build(Dialect::Dl, source, DlTreeVisitor::new())?.finish();
    let root = root.ok_or(PipelineError::EmptyAst)?;
    tracing::info!("Collected {} DL identifier(s)", identifiers.len());
    Ok(DlAst { root, identifiers })
}

/// `keymaerax` prepares relational statements for DL output, see
/// `RelDlTreeVisitor`.
pub fn generate_reldl_ast(source: &str, keymaerax: bool) -> Result<RelDlAst, PipelineError> {
    let visitor = RelDlTreeVisitor::new(keymaerax);
    let (root, identifiers) = build(Dialect::RelDl, source, visitor)?.finish();
    let root = root.ok_or(PipelineError::EmptyAst)?;
    tracing::info!("Collected {} RelDL identifier(s)", identifiers.len());
    Ok(RelDlAst { root, identifiers })
}

/// Runs whole inputs through the translator. Holds no per-input state, so
/// one instance can serve several threads.
#[derive(Clone, Debug, Default)]
pub struct Pipeline<G = UuidGenerator> {
    formatter: ArchiveFormatter<G>,
}

impl Pipeline<UuidGenerator> {
    pub fn new() -> Self {
        Pipeline {
            formatter: ArchiveFormatter::new(),
        }
    }
}

impl<G: IdGenerator> Pipeline<G> {
    pub fn with_generator(ids: G) -> Self {
        Pipeline {
            formatter: ArchiveFormatter::with_generator(ids),
        }
    }

    /// The pretty-printed AST. RelDL trees are built without KeYmaeraX
    /// preparation.
    pub fn generate_ast(&self, dialect: Dialect, source: &str) -> Result<String, PipelineError> {
        let root = match dialect {
            Dialect::Dl => generate_dl_ast(source)?.root,
            Dialect::RelDl => generate_reldl_ast(source, false)?.root,
        };
        let tree = root.to_tree_string();
        tracing::debug!("{}", tree);
        Ok(tree)
    }

    /// The KeYmaeraX archive for `source`, `None` if there is nothing to
    /// put in the problem section.
    pub fn convert(&self, dialect: Dialect, source: &str) -> Result<Option<String>, PipelineError> {
        match dialect {
            Dialect::Dl => {
                let DlAst {
                    mut root,
                    identifiers,
                } = generate_dl_ast(source)?;
                let problem = serialize(&mut root);
                Ok(self.archive(dialect, &identifiers, &problem))
            }
            Dialect::RelDl => {
                let RelDlAst {
                    mut root,
                    identifiers,
                } = generate_reldl_ast(source, true)?;
                let lowering = RelDlToDlLowering::new(&identifiers);
                lowering.lower(&mut root);
                let problem = serialize(&mut root);
                Ok(self.archive(dialect, lowering.identifiers(), &problem))
            }
        }
    }

    fn archive(&self, dialect: Dialect, identifiers: &BTreeSet<Ident>, problem: &str) -> Option<String> {
        if problem.is_empty() {
            tracing::warn!("Serialized {} problem is empty, skipping", dialect);
            return None;
        }
        Some(self.formatter.format(dialect.name(), identifiers, problem))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobType {
    DlAstGeneration,
    DlToKeYmaeraX,
    RelDlAstGeneration,
    RelDlToKeYmaeraX,
}

impl JobType {
    pub fn name(&self) -> &'static str {
        match *self {
            JobType::DlAstGeneration => "DLASTGENERATION",
            JobType::DlToKeYmaeraX => "DLTOKEYMAERAXOUTPUT",
            JobType::RelDlAstGeneration => "RELDLASTGENERATION",
            JobType::RelDlToKeYmaeraX => "RELDLTOKEYMAERAXOUTPUT",
        }
    }

    pub fn dialect(&self) -> Dialect {
        match *self {
            JobType::DlAstGeneration | JobType::DlToKeYmaeraX => Dialect::Dl,
            JobType::RelDlAstGeneration | JobType::RelDlToKeYmaeraX => Dialect::RelDl,
        }
    }

    pub fn is_conversion(&self) -> bool {
        match *self {
            JobType::DlToKeYmaeraX | JobType::RelDlToKeYmaeraX => true,
            JobType::DlAstGeneration | JobType::RelDlAstGeneration => false,
        }
    }

    pub fn extension<'a>(&self, config: &'a Config) -> &'a str {
        if self.is_conversion() {
            &config.keymaerax_extension
        } else {
            &config.ast_extension
        }
    }
}

impl FromStr for JobType {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, JobError> {
        match s.trim().to_uppercase().as_str() {
            "DLASTGENERATION" => Ok(JobType::DlAstGeneration),
            "DLTOKEYMAERAXOUTPUT" => Ok(JobType::DlToKeYmaeraX),
            "RELDLASTGENERATION" => Ok(JobType::RelDlAstGeneration),
            "RELDLTOKEYMAERAXOUTPUT" => Ok(JobType::RelDlToKeYmaeraX),
            _ => Err(JobError::UnknownJob(String::from(s))),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// `<dir>/<input file name>.<ext>`
fn output_path(config: &Config, input: &Path, extension: &str) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("input"));
    config.output_dir.join(format!("{}.{}", name, extension))
}

/// Runs `job` on one input file and writes the result into the configured
/// output directory. Returns the written path, or `None` if the job had
/// nothing to write.
pub fn run_job<G: IdGenerator>(
    config: &Config,
    pipeline: &Pipeline<G>,
    job: JobType,
    input: &Path,
) -> Result<Option<PathBuf>, JobError> {
    if !input.is_file() {
        return Err(JobError::MissingInput(input.to_path_buf()));
    }
    let source = fs::read_to_string(input).map_err(|source| JobError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    tracing::info!(
        "Running {} on {:?}: '{}'",
        job,
        input,
        format_input_for_logging(source.trim(), config.log_truncation)
    );

    let output = if job.is_conversion() {
        pipeline.convert(job.dialect(), &source)?
    } else {
        Some(pipeline.generate_ast(job.dialect(), &source)?)
    };
    let output = match output {
        Some(output) => output,
        None => {
            tracing::warn!("{} produced no output for {:?}", job, input);
            return Ok(None);
        }
    };

    fs::create_dir_all(&config.output_dir).map_err(|source| JobError::Io {
        path: config.output_dir.clone(),
        source,
    })?;
    let path = output_path(config, input, job.extension(config));
    fs::write(&path, output).map_err(|source| JobError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!("{} wrote {:?}", job, path);
    Ok(Some(path))
}
