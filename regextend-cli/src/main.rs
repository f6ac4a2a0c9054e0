use clap::{Parser, Subcommand};
use colored::Colorize;
use regextend::{ExtendedMatch, ExtendedRegex, transform, transform_debug};

#[derive(Parser)]
#[command(name = "regextend")]
#[command(about = "Regextend - regular expressions with capturing group offsets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pattern against input and show group offsets
    Exec {
        /// The regex pattern
        pattern: String,
        /// The input string
        input: String,
        /// Flags such as "gim"
        #[arg(short, long, default_value = "")]
        flags: String,
        /// Show every match, following the global search cursor
        #[arg(short, long)]
        all: bool,
    },
    /// Check if pattern matches
    Test {
        /// The regex pattern
        pattern: String,
        /// The input string
        input: String,
        /// Flags such as "gim"
        #[arg(short, long, default_value = "")]
        flags: String,
    },
    /// Replace matches using `$1`, `$&`, `` $` ``, `$'` and `$$`
    Replace {
        /// The regex pattern
        pattern: String,
        /// The input string
        input: String,
        /// The replacement template
        replacement: String,
        /// Flags such as "gim"
        #[arg(short, long, default_value = "")]
        flags: String,
    },
    /// Show the rewritten pattern used for matching
    Transform {
        /// The pattern to rewrite
        pattern: String,
        /// Show lexer tokens as well
        #[arg(short, long)]
        debug: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Exec {
            pattern,
            input,
            flags,
            all,
        } => cmd_exec(&pattern, &input, &flags, all),
        Commands::Test {
            pattern,
            input,
            flags,
        } => cmd_test(&pattern, &input, &flags),
        Commands::Replace {
            pattern,
            input,
            replacement,
            flags,
        } => cmd_replace(&pattern, &input, &replacement, &flags),
        Commands::Transform { pattern, debug } => cmd_transform(&pattern, debug),
    }
}

fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), error);
    std::process::exit(1);
}

fn compile(pattern: &str, flags: &str) -> ExtendedRegex {
    ExtendedRegex::new(pattern, flags).unwrap_or_else(|e| fail(e))
}

fn format_offset(offset: Option<usize>) -> String {
    match offset {
        Some(offset) => offset.to_string(),
        None => "-1".to_string(),
    }
}

fn print_match(n: usize, m: &ExtendedMatch<'_>) {
    println!(
        "  [{}] {}..{} = {}",
        n,
        m.index(),
        m.end(),
        m.as_str().green()
    );
    for i in 1..m.len() {
        let text = match m.get(i) {
            Some(text) => text.green(),
            None => "undefined".dimmed(),
        };
        println!("      Group {}: @{} = {}", i, format_offset(m.offset(i)), text);
    }
    let offsets: Vec<String> = m.offsets().iter().copied().map(format_offset).collect();
    println!("      Offsets: [{}]", offsets.join(", ").cyan());
}

fn cmd_exec(pattern: &str, input: &str, flags: &str, all: bool) {
    let mut regex = compile(pattern, flags);

    println!("{}", "Executing pattern...".bold());
    println!("  Pattern: {}", regex.to_string().cyan());
    println!("  Input:   {}", input.yellow());
    println!();

    if all && !regex.flags().global {
        fail("--all requires the 'g' flag");
    }

    let mut count = 0;
    loop {
        let m = match regex.exec(input) {
            Ok(Some(m)) => m,
            Ok(None) => break,
            Err(e) => fail(e),
        };
        count += 1;
        print_match(count, &m);

        if !all {
            break;
        }
        if m.as_str().is_empty() {
            // Step over the empty match so the cursor keeps moving
            let next = input[m.end()..]
                .chars()
                .next()
                .map_or(m.end() + 1, |c| m.end() + c.len_utf8());
            regex.set_last_index(next);
        }
    }

    if count == 0 {
        println!("{}", "✗ No match".red());
    }
}

fn cmd_test(pattern: &str, input: &str, flags: &str) {
    let mut regex = compile(pattern, flags);

    match regex.test(input) {
        Ok(true) => {
            println!("{}", "true".green());
            std::process::exit(0);
        }
        Ok(false) => {
            println!("{}", "false".red());
            std::process::exit(1);
        }
        Err(e) => fail(e),
    }
}

fn cmd_replace(pattern: &str, input: &str, replacement: &str, flags: &str) {
    let regex = compile(pattern, flags);

    match regex.replace(input, replacement) {
        Ok(result) => println!("{}", result),
        Err(e) => fail(e),
    }
}

fn cmd_transform(pattern: &str, debug: bool) {
    println!("{}", "Transforming pattern...".bold());
    println!("  Input:  {}", pattern.cyan());
    println!();

    if debug {
        transform_debug(pattern).report();
    } else {
        let result = transform(pattern);
        println!("{} ({} groups)", "Output:".bold(), result.group_count);
        println!("  {}", result.pattern.green());
    }
}
