// stave-cli: shared utilities for CLI tools.

use std::path::PathBuf;
use std::process;

use stave_core::result::SourceFlag;
use stave_da::engine::TypoEngine;
use stave_da::policy::PolicyConfig;
use stave_da::DictionarySource;

/// Core wordlist file name (word + frequency per line).
const CORE_WORDLIST: &str = "da_core.txt";

/// Extended wordlist file name (membership only).
const EXTENDED_WORDLIST: &str = "da_extended.txt";

/// User lexicon file name.
const USER_WORDLIST: &str = "da_user.txt";

/// Search for wordlist files and create a TypoEngine.
///
/// Search order for the dictionary directory:
/// 1. `dict_path` argument (if provided)
/// 2. `STAVE_DICT_PATH` environment variable
/// 3. `~/.stave`
/// 4. Current working directory
///
/// The policy comes from `policy_path`, then the `STAVE_POLICY_PATH`
/// environment variable, then the built-in reference document.
pub fn load_engine(
    policy_path: Option<&str>,
    dict_path: Option<&str>,
) -> Result<TypoEngine, String> {
    let policy = load_policy(policy_path)?;
    let search_paths = build_search_paths(dict_path);

    for dir in &search_paths {
        if !dir.join(CORE_WORDLIST).is_file() {
            continue;
        }
        let mut sources = vec![DictionarySource::new(
            SourceFlag::CoreWordlist,
            0.6,
            dir.join(CORE_WORDLIST),
        )];
        if dir.join(EXTENDED_WORDLIST).is_file() {
            sources.push(DictionarySource::new(
                SourceFlag::ExtendedWordlist,
                0.4,
                dir.join(EXTENDED_WORDLIST),
            ));
        }
        if dir.join(USER_WORDLIST).is_file() {
            sources.push(DictionarySource::new(
                SourceFlag::UserLexicon,
                1.0,
                dir.join(USER_WORDLIST),
            ));
        }
        return Ok(TypoEngine::new(policy, &sources));
    }

    Err(format!(
        "could not find {} in any of the search paths:\n{}",
        CORE_WORDLIST,
        search_paths
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

fn load_policy(policy_path: Option<&str>) -> Result<PolicyConfig, String> {
    if let Some(path) = policy_path {
        return PolicyConfig::from_path(path).map_err(|e| e.to_string());
    }
    if let Ok(path) = std::env::var("STAVE_POLICY_PATH") {
        return PolicyConfig::from_path(&path).map_err(|e| e.to_string());
    }
    PolicyConfig::builtin().map_err(|e| e.to_string())
}

/// Build the list of directories to search for wordlist files.
fn build_search_paths(dict_path: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Explicit path from argument
    if let Some(p) = dict_path {
        paths.push(PathBuf::from(p));
    }

    // 2. STAVE_DICT_PATH environment variable
    if let Ok(env_path) = std::env::var("STAVE_DICT_PATH") {
        paths.push(PathBuf::from(env_path));
    }

    // 3. Home directory
    if let Some(home) = home_dir() {
        paths.push(home.join(".stave"));
    }

    // 4. Current directory (fallback for local development)
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd);
    }

    paths
}

/// Get the user's home directory.
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Parse a `--dict-path=PATH` / `-d PATH` and a `--policy=PATH` / `-p PATH`
/// argument from command line args.
///
/// Returns `(dict_path, policy_path, remaining_args)`.
pub fn parse_common_paths(args: &[String]) -> (Option<String>, Option<String>, Vec<String>) {
    let mut dict_path = None;
    let mut policy_path = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix("--dict-path=") {
            dict_path = Some(val.to_string());
        } else if let Some(val) = arg.strip_prefix("--policy=") {
            policy_path = Some(val.to_string());
        } else if arg == "--dict-path" || arg == "-d" {
            if i + 1 < args.len() {
                dict_path = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                eprintln!("error: {} requires a value", arg);
                process::exit(1);
            }
        } else if arg == "--policy" || arg == "-p" {
            if i + 1 < args.len() {
                policy_path = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                eprintln!("error: {} requires a value", arg);
                process::exit(1);
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (dict_path, policy_path, remaining)
}

/// Initialize stderr logging from the `RUST_LOG` environment variable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_equals_form() {
        let (dict, policy, rest) =
            parse_common_paths(&args(&["--dict-path=/tmp/dict", "--policy=/tmp/p.json", "kat"]));
        assert_eq!(dict.as_deref(), Some("/tmp/dict"));
        assert_eq!(policy.as_deref(), Some("/tmp/p.json"));
        assert_eq!(rest, args(&["kat"]));
    }

    #[test]
    fn parses_separate_value_form() {
        let (dict, policy, rest) =
            parse_common_paths(&args(&["-d", "/tmp/dict", "-p", "/tmp/p.json"]));
        assert_eq!(dict.as_deref(), Some("/tmp/dict"));
        assert_eq!(policy.as_deref(), Some("/tmp/p.json"));
        assert!(rest.is_empty());
    }

    #[test]
    fn passes_through_unrelated_args() {
        let (dict, policy, rest) = parse_common_paths(&args(&["--json", "spisr"]));
        assert!(dict.is_none());
        assert!(policy.is_none());
        assert_eq!(rest, args(&["--json", "spisr"]));
    }
}
