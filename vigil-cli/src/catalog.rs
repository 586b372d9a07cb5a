//! Target catalog assembly from CLI arguments and target files.

use std::fs;
use std::path::Path;

use url::Url;
use vigil_engine::Target;

use crate::error::{CliError, Result};

/// Builds the catalog from positional URLs plus an optional targets file,
/// applying `max_frequency_hz` to every entry.
///
/// File format: one target per line, `<url>` or `<url> <template>`,
/// whitespace separated. Blank lines are skipped; `#` starts a comment at
/// the start of a line or after whitespace.
pub fn load(
    urls: &[String],
    targets_file: Option<&Path>,
    max_frequency_hz: f64,
) -> Result<Vec<Target>> {
    let mut targets = Vec::new();
    for url in urls {
        targets.push(literal_target(url)?);
    }
    if let Some(path) = targets_file {
        let content = fs::read_to_string(path).map_err(|source| CliError::TargetsFile {
            path: path.to_owned(),
            source,
        })?;
        targets.extend(parse_lines(&content)?);
    }
    if targets.is_empty() {
        return Err(CliError::EmptyCatalog);
    }
    Ok(targets
        .into_iter()
        .map(|target| target.with_max_frequency_hz(max_frequency_hz))
        .collect())
}

fn literal_target(url: &str) -> Result<Target> {
    if url.contains('{') {
        return Err(CliError::invalid_target(
            url,
            "templates belong in the targets file, next to their base URL",
        ));
    }
    check_url(url).map_err(|reason| CliError::invalid_target(url, reason))?;
    Ok(Target::literal(url))
}

fn parse_lines(content: &str) -> Result<Vec<Target>> {
    let mut targets = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(url) = fields.next() else { continue };
        let template = fields.next();
        if fields.next().is_some() {
            return Err(CliError::invalid_line(
                index + 1,
                "expected `<url>` or `<url> <template>`",
            ));
        }

        let target = match template {
            Some(template) => {
                if url.contains('{') {
                    return Err(CliError::invalid_line(index + 1, "base URL must be literal"));
                }
                check_url(url)
                    .and_then(|()| check_template(template))
                    .map_err(|reason| CliError::invalid_line(index + 1, reason))?;
                Target::templated(url, template)
            }
            None => {
                if url.contains('{') {
                    return Err(CliError::invalid_line(
                        index + 1,
                        "a template needs a base URL before it",
                    ));
                }
                check_url(url).map_err(|reason| CliError::invalid_line(index + 1, reason))?;
                Target::literal(url)
            }
        };
        targets.push(target);
    }
    Ok(targets)
}

/// Drops everything from a `#` that starts the line or follows whitespace.
fn strip_comment(raw: &str) -> &str {
    match raw.find('#') {
        Some(0) => "",
        Some(pos) if raw[..pos].ends_with(char::is_whitespace) => &raw[..pos],
        _ => raw,
    }
}

fn check_url(url: &str) -> std::result::Result<(), String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!("`{url}` must use http or https"));
    }
    Url::parse(url).map_err(|error| format!("`{url}` is not a valid URL: {error}"))?;
    Ok(())
}

fn check_template(template: &str) -> std::result::Result<(), String> {
    if !template.starts_with("http://") && !template.starts_with("https://") {
        return Err(format!("template `{template}` must use http or https"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_urls_become_literal_targets() {
        let targets = load(
            &["https://example.com/".to_owned(), "http://example.org".to_owned()],
            None,
            4.0,
        )
        .unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].identifier, "example.com/");
        assert_eq!(targets[0].url_template, "https://example.com/");
        assert!(targets.iter().all(|t| t.max_frequency_hz == 4.0));
    }

    #[test]
    fn no_targets_at_all_is_an_error() {
        assert!(matches!(load(&[], None, 2.0), Err(CliError::EmptyCatalog)));
    }

    #[test]
    fn positional_template_is_rejected() {
        let result = load(&["https://example.com/{year}/".to_owned()], None, 2.0);
        assert!(matches!(result, Err(CliError::InvalidTarget { .. })));
    }

    #[test]
    fn file_lines_parse_literals_templates_and_comments() {
        let content = "\
# probe set
https://example.com/

https://example.org/ https://example.org/news/{year}/{month}/{day}/{text}/
https://example.net/lenta/   # trailing comment
";
        let targets = parse_lines(content).unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].identifier, "example.com/");
        assert_eq!(targets[1].identifier, "example.org/");
        assert!(targets[1].url_template.contains("{year}"));
        assert_eq!(targets[2].url_template, "https://example.net/lenta/");
    }

    #[test]
    fn file_line_with_extra_fields_is_rejected() {
        let result = parse_lines("https://a.example/ https://a.example/{text} extra");
        assert!(matches!(result, Err(CliError::InvalidLine { line: 1, .. })));
    }

    #[test]
    fn file_line_with_bad_scheme_is_rejected() {
        let result = parse_lines("ftp://a.example/");
        assert!(matches!(result, Err(CliError::InvalidLine { line: 1, .. })));
    }

    #[test]
    fn bare_template_line_is_rejected() {
        let result = parse_lines("https://a.example/{year}/");
        assert!(matches!(result, Err(CliError::InvalidLine { line: 1, .. })));
    }

    #[test]
    fn fragment_urls_survive_comment_stripping() {
        let targets = parse_lines("https://example.com/page#section").unwrap();
        assert_eq!(targets[0].url_template, "https://example.com/page#section");
    }
}
