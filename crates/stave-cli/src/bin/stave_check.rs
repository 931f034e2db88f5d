// stave-check: Classify tokens from stdin or arguments.
//
// Prints one line per token: the token, its classification, the
// confidence, and the reason tags.
//
// Usage:
//   stave-check [-d DICT_PATH] [-p POLICY_PATH] [WORD...]
//
// Options:
//   -d, --dict-path PATH   Dictionary directory containing da_core.txt
//   -p, --policy PATH      Policy JSON document (default: built-in)
//   -h, --help             Print help

use std::io::{self, BufRead, Write};

use stave_da::engine::{ClassifyRequest, TypoEngine};

fn main() {
    stave_cli::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (dict_path, policy_path, args) = stave_cli::parse_common_paths(&args);

    if stave_cli::wants_help(&args) {
        println!("stave-check: Classify tokens as typo_likely, uncertain, or new.");
        println!();
        println!("Usage: stave-check [-d DICT_PATH] [-p POLICY_PATH] [WORD...]");
        println!();
        println!("If WORD arguments are given, classifies each word.");
        println!("Otherwise reads words from stdin (one per line).");
        println!();
        println!("Options:");
        println!("  -d, --dict-path PATH   Dictionary directory containing da_core.txt");
        println!("  -p, --policy PATH      Policy JSON document (default: built-in)");
        println!("  -h, --help             Print this help");
        return;
    }

    let engine = stave_cli::load_engine(policy_path.as_deref(), dict_path.as_deref())
        .unwrap_or_else(|e| stave_cli::fatal(&e));

    let words: Vec<String> = args.into_iter().filter(|a| !a.starts_with('-')).collect();

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let check_word = |word: &str, engine: &TypoEngine, out: &mut io::BufWriter<io::StdoutLock<'_>>| {
        let result = engine.classify(&ClassifyRequest::new(word));
        let tags: Vec<&str> = result.reason_tags.iter().map(|t| t.as_str()).collect();
        let _ = writeln!(
            out,
            "{word}\t{}\t{:.2}\t{}",
            result.status.as_str(),
            result.confidence,
            tags.join(",")
        );
    };

    if words.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("error reading stdin: {e}");
                    break;
                }
            };
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            check_word(word, &engine, &mut out);
        }
    } else {
        for word in &words {
            check_word(word, &engine, &mut out);
        }
    }
}
