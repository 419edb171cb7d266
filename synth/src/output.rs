use crate::error::{SynthError, SynthResult};
use std::fs;
use std::path::{Path, PathBuf};
use topology::{ResourceKind, Stack};
use tracing::info;

pub const DEFAULT_OUT_DIR: &str = "synth.out";

/// Write `{out_dir}/{StackId}.template.json` for every stack.
///
/// All templates are serialized before the first file is touched, so a
/// serialization failure leaves the output directory unchanged.
pub fn write_templates(stacks: &[Stack], out_dir: &Path) -> SynthResult<Vec<PathBuf>> {
    let rendered = stacks
        .iter()
        .map(|stack| -> SynthResult<(PathBuf, String)> {
            Ok((out_dir.join(stack.template_file_name()), stack.to_template_json()?))
        })
        .collect::<SynthResult<Vec<_>>>()?;

    fs::create_dir_all(out_dir).map_err(|source| SynthError::TemplateWrite {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(rendered.len());
    for (path, json) in rendered {
        fs::write(&path, json).map_err(|source| SynthError::TemplateWrite {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote template");
        written.push(path);
    }

    Ok(written)
}

/// Human-readable listener table for one stack.
pub fn render_routes(stack: &Stack) -> String {
    let listener = &stack.topology.listener;
    let mut lines = vec![format!(
        "{} ({} rules incl. default)",
        stack.id,
        listener.total_rules()
    )];

    let mut rules: Vec<_> = listener.rules.iter().collect();
    rules.sort_by_key(|rule| rule.priority);
    lines.extend(rules.into_iter().map(|rule| {
        format!(
            "  {:>5}  {:<40} -> {}",
            rule.priority,
            rule.path_patterns.join(", "),
            rule.target
        )
    }));

    let topology::DefaultAction::FixedResponse {
        status_code,
        content_type,
        message_body,
    } = &listener.default_action;
    lines.push(format!(
        "  {:>5}  {:<40} -> fixed response {} {} {:?}",
        "*", "(default)", status_code, content_type, message_body
    ));

    join_lines(lines)
}

/// Stack header followed by its services, target groups and databases.
pub fn render_summary(stack: &Stack) -> String {
    let account = stack.target.account.as_deref().unwrap_or("<unset>");
    let mut lines = vec![format!(
        "{}: account {} region {}, {} resources",
        stack.id,
        account,
        stack.target.region,
        stack.topology.resources.len()
    )];

    for kind in [
        ResourceKind::FargateService,
        ResourceKind::TargetGroup,
        ResourceKind::PostgresInstance,
        ResourceKind::SqlServerInstance,
    ] {
        lines.extend(
            stack
                .topology
                .resources_of(kind)
                .map(|resource| format!("  {:<20} {}", kind.to_string(), resource.name)),
        );
    }

    join_lines(lines)
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
