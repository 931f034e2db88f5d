// stave-suggest: Full classification results as JSON, one object per line.
//
// Reads tokens from stdin (one per line) or from arguments and prints the
// complete classification result for each: status, normalized form,
// ranked suggestions, confidence, and reason tags.
//
// Usage:
//   stave-suggest [-d DICT_PATH] [-p POLICY_PATH] [OPTIONS] [WORD...]
//
// Options:
//   -d, --dict-path PATH   Dictionary directory containing da_core.txt
//   -p, --policy PATH      Policy JSON document (default: built-in)
//   --pos TAG              POS tag to attach to every token
//   --sentence-start       Mark every token as sentence-initial
//   -h, --help             Print help

use std::io::{self, BufRead, Write};

use stave_da::engine::{ClassifyRequest, TypoEngine};

struct Options {
    pos_tag: Option<String>,
    sentence_start: bool,
    words: Vec<String>,
}

fn parse_options(args: Vec<String>) -> Options {
    let mut pos_tag = None;
    let mut sentence_start = false;
    let mut words = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix("--pos=") {
            pos_tag = Some(val.to_string());
        } else if arg == "--pos" {
            if i + 1 < args.len() {
                pos_tag = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                stave_cli::fatal("--pos requires a value");
            }
        } else if arg == "--sentence-start" {
            sentence_start = true;
        } else if !arg.starts_with('-') {
            words.push(arg.clone());
        }
    }

    Options {
        pos_tag,
        sentence_start,
        words,
    }
}

fn main() {
    stave_cli::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (dict_path, policy_path, args) = stave_cli::parse_common_paths(&args);

    if stave_cli::wants_help(&args) {
        println!("stave-suggest: Full classification results as JSON.");
        println!();
        println!("Usage: stave-suggest [-d DICT_PATH] [-p POLICY_PATH] [OPTIONS] [WORD...]");
        println!();
        println!("If WORD arguments are given, classifies each word.");
        println!("Otherwise reads words from stdin (one per line).");
        println!("Prints one JSON object per token.");
        println!();
        println!("Options:");
        println!("  -d, --dict-path PATH   Dictionary directory containing da_core.txt");
        println!("  -p, --policy PATH      Policy JSON document (default: built-in)");
        println!("  --pos TAG              POS tag to attach to every token");
        println!("  --sentence-start       Mark every token as sentence-initial");
        println!("  -h, --help             Print this help");
        return;
    }

    let options = parse_options(args);
    let engine = stave_cli::load_engine(policy_path.as_deref(), dict_path.as_deref())
        .unwrap_or_else(|e| stave_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let suggest_word = |word: &str,
                        engine: &TypoEngine,
                        out: &mut io::BufWriter<io::StdoutLock<'_>>| {
        let mut request = ClassifyRequest::new(word);
        request.pos_tag = options.pos_tag.as_deref();
        request.sentence_start = options.sentence_start;
        let result = engine.classify(&request);
        match serde_json::to_string(&result) {
            Ok(json) => {
                let _ = writeln!(out, "{json}");
            }
            Err(e) => eprintln!("error serializing result for {word:?}: {e}"),
        }
    };

    if options.words.is_empty() {
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
            suggest_word(word, &engine, &mut out);
        }
    } else {
        for word in &options.words {
            suggest_word(word, &engine, &mut out);
        }
    }
}
