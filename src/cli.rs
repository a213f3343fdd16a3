use std::io::{self, Write};
use embeddb::VectorStore;
use serde_json::Map;

pub enum Command {
    Store { namespace: String, key: String, vec: Vec<f32> },
    Search { namespace: String, vec: Vec<f32>, k: usize, min_score: f32 },
    List { namespace: String, limit: usize },
    Count { namespace: String },
    Namespaces,
}

/// Parse a command from a provided argument vector
pub fn parse_command_from_args(args: &[String]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("No command provided. Use: store, search, list, count, namespaces".to_string());
    }

    let command = &args[1];

    match command.as_str() {
        "store" => parse_store(args),
        "search" => parse_search(args),
        "list" => parse_list(args),
        "count" => parse_count(args),
        "namespaces" => parse_namespaces(args),
        _ => Err(format!("Unknown command: {}. Available: store, search, list, count, namespaces", command)),
    }
}

/// Parse the 'store' command
/// Usage: embeddb store <namespace> <key> <vector>
fn parse_store(args: &[String]) -> Result<Command, String> {
    // args[0] = program name
    // args[1] = "store"
    // args[2] = namespace (required)
    // args[3] = key (required)
    // args[4..] = vector (required, at least 1)
    if args.len() < 5 {
        return Err("'store' command requires a namespace, a key and a vector. Usage: embeddb store <namespace> <key> <vector>".to_string());
    }

    let namespace = args[2].clone();
    let key = args[3].clone();
    let vec: Result<Vec<f32>, _> = args[4..].iter()
        .map(|s| s.parse::<f32>())
        .collect();

    match vec {
        Ok(v) => Ok(Command::Store { namespace, key, vec: v }),
        Err(_) => Err("Vector parsing error".to_string()),
    }
}

/// Parse the 'search' command
/// Usage: embeddb search <namespace> <v1> <v2> ... [--k <number>] [--min-score <float>]
fn parse_search(args: &[String]) -> Result<Command, String> {
    // args[0] = program name
    // args[1] = "search"
    // args[2] = namespace (required)
    // args[3..] = vector components and optional trailing flags

    if args.len() < 4 {
        return Err("'search' command requires a namespace and at least one vector component. Usage: embeddb search <namespace> <v1> <v2> ... [--k <number>] [--min-score <float>]".to_string());
    }

    let namespace = args[2].clone();
    let mut k = 10; // default value
    let mut min_score = 0.5_f32; // default value
    let mut vector_end = args.len();

    // Consume trailing flag/value pairs
    while vector_end >= 5 {
        let flag = &args[vector_end - 2];
        let value = &args[vector_end - 1];

        if flag == "--k" {
            match value.parse::<usize>() {
                Ok(parsed) => {
                    k = parsed;
                    vector_end -= 2;
                }
                Err(_) => {
                    return Err(format!("Invalid --k value: '{}'. Must be a positive integer.", value));
                }
            }
        } else if flag == "--min-score" {
            match value.parse::<f32>() {
                Ok(parsed) => {
                    min_score = parsed;
                    vector_end -= 2;
                }
                Err(_) => {
                    return Err(format!("Invalid --min-score value: '{}'. Must be a float.", value));
                }
            }
        } else {
            break;
        }
    }

    // Parse vector components from args[3] to vector_end
    let vec: Result<Vec<f32>, _> = args[3..vector_end].iter()
        .map(|s| s.parse::<f32>())
        .collect();

    match vec {
        Ok(v) => {
            if v.is_empty() {
                return Err("Search vector cannot be empty".to_string());
            }
            Ok(Command::Search { namespace, vec: v, k, min_score })
        }
        Err(_) => Err("Failed to parse vector components as numbers".to_string()),
    }
}

/// Parse the 'list' command
/// Usage: embeddb list <namespace> [--limit <number>]
fn parse_list(args: &[String]) -> Result<Command, String> {
    // args[0] = program name
    // args[1] = "list"
    // args[2] = namespace (required)
    if args.len() < 3 {
        return Err("'list' command requires a namespace. Usage: embeddb list <namespace> [--limit <number>]".to_string());
    }

    let namespace = args[2].clone();
    let mut limit = 1000; // default value

    if args.len() >= 5 && args[3] == "--limit" {
        match args[4].parse::<usize>() {
            Ok(parsed) => limit = parsed,
            Err(_) => {
                return Err(format!("Invalid --limit value: '{}'. Must be a positive integer.", args[4]));
            }
        }
    }

    Ok(Command::List { namespace, limit })
}

/// Parse the 'count' command
/// Usage: embeddb count <namespace>
fn parse_count(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("'count' command requires a namespace. Usage: embeddb count <namespace>".to_string());
    }

    let namespace = args[2].clone();
    Ok(Command::Count { namespace })
}

/// Parse the 'namespaces' command
/// Usage: embeddb namespaces
fn parse_namespaces(args: &[String]) -> Result<Command, String> {
    // Namespaces takes no arguments
    if args.len() > 2 {
        eprintln!("Warning: 'namespaces' command takes no arguments, ignoring extras");
    }

    Ok(Command::Namespaces)
}

/// REPL mode - interactive session over an in-memory store
/// Everything typed here is gone when the session ends
pub fn run_repl(store: &VectorStore) {
    println!("EmbedDB - Ephemeral Vector Store");
    println!("Type 'help' for commands, 'exit' or 'quit' to quit\n");

    loop {
        print!("embeddb> ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(_) => {}
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "exit" || input == "quit" {
            println!("Goodbye!");
            break;
        }

        if input == "help" {
            print_help();
            continue;
        }

        let mut args: Vec<String> = vec!["embeddb".to_string()];
        args.extend(input.split_whitespace().map(|s| s.to_string()));

        let command = match parse_command_from_args(&args) {
            Ok(cmd) => cmd,
            Err(error) => {
                eprintln!("Error: {}", error);
                continue;
            }
        };

        execute_command(store, command);
    }
}

fn execute_command(store: &VectorStore, command: Command) {
    match command {
        Command::Store { namespace, key, vec } => {
            store.store(&namespace, key.clone(), vec, Map::new());
            println!("Stored '{}' in namespace '{}'", key, namespace);
        }

        Command::Search { namespace, vec, k, min_score } => {
            match store.search(&namespace, &vec, k, min_score) {
                Ok(results) => {
                    if results.is_empty() {
                        println!("No results found");
                    } else {
                        println!("Top {} results:", results.len());
                        for (rank, result) in results.iter().enumerate() {
                            println!("{}. Key: {}, Score: {:.4}", rank + 1, result.key, result.score);
                        }
                    }
                }
                Err(error) => eprintln!("Error: {}", error),
            }
        }

        Command::List { namespace, limit } => {
            let entries = store.list(&namespace, limit);
            if entries.is_empty() {
                println!("Namespace '{}' is empty", namespace);
            } else {
                println!("Stored vectors in '{}':", namespace);
                for entry in &entries {
                    println!("  {}: {:?}", entry.key, entry.embedding);
                }
                println!("Total: {} vectors", store.count(&namespace));
            }
        }

        Command::Count { namespace } => println!("{}", store.count(&namespace)),

        Command::Namespaces => {
            let names = store.namespaces();
            if names.is_empty() {
                println!("No namespaces yet");
            } else {
                for name in names {
                    println!("  {}", name);
                }
            }
        }
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  store <ns> <key> <v1> <v2> ...                        - Store a vector");
    println!("  search <ns> <v1> <v2> ... [--k N] [--min-score S]     - Search a namespace (default k=10, min-score=0.5)");
    println!("  list <ns> [--limit N]                                 - List a namespace's vectors");
    println!("  count <ns>                                            - Show a namespace's vector count");
    println!("  namespaces                                            - List namespaces");
    println!("  help                                                  - Show this help");
    println!("  exit, quit                                            - Exit the program");
}
