//! Command line tool for decoding interchange key blocks.
//!
//! Parses a key block, optionally decrypts it with a key block protection
//! key, and prints the decoded structure. Diagnostics go to stderr; the
//! decoded fields go to stdout. The exit status is 0 only when the block
//! parsed, verified and decrypted completely.

use std::process::ExitCode;

use clap::Parser;

use keysec::keyblock::{
    algorithm_string, exportability_string, key_usage_string, mode_of_use_string,
    opt_block_id_string, unwrap, KeyBlock, KeyVersion,
};

/// Maximum protection key size in bytes (AES-256).
const MAX_KBPK_LEN: usize = 32;

#[derive(Parser)]
#[command(name = "keysec-tool", disable_version_flag = true)]
#[command(about = "Decode and decrypt TR-31 / X9.143 interchange key blocks")]
struct Args {
    /// Key block input
    #[arg(short = 'i', long = "key-block", value_name = "BLOCK")]
    key_block: Option<String>,

    /// Key block protection key value (hex encoded)
    #[arg(short = 'k', long = "kbpk", value_name = "KEY")]
    kbpk: Option<String>,

    /// Display library version
    #[arg(short = 'v', long = "version")]
    version: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.version {
        println!("{}", keysec::version());
        return ExitCode::SUCCESS;
    }

    let Some(key_block) = args.key_block.as_deref() else {
        eprintln!("a key block input is required; see --help");
        return ExitCode::FAILURE;
    };

    let kbpk = match args.kbpk.as_deref().map(parse_kbpk).transpose() {
        Ok(kbpk) => kbpk,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    match unwrap(kbpk.as_deref(), key_block) {
        Ok(ctx) => {
            print_key_block(&ctx);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("import error: {err}");
            // Print whatever was recovered so a bad block stays inspectable.
            if let Some(ctx) = err.context() {
                print_key_block(ctx);
            }
            ExitCode::FAILURE
        }
    }
}

fn parse_kbpk(hex_str: &str) -> Result<Vec<u8>, String> {
    if hex_str.len() % 2 != 0 {
        return Err("kbpk string must have an even number of hex digits".to_string());
    }
    if hex_str.len() > MAX_KBPK_LEN * 2 {
        return Err(format!(
            "kbpk string may not have more than {} digits (thus {} bytes)",
            MAX_KBPK_LEN * 2,
            MAX_KBPK_LEN
        ));
    }
    hex::decode(hex_str).map_err(|_| "kbpk string must consist of hex digits".to_string())
}

fn print_key_block(ctx: &KeyBlock) {
    let header = ctx.header();
    let key = ctx.key();

    println!("Key block format version: {}", header.version_id());
    println!("Key block length: {} bytes", header.kb_length());
    println!(
        "Key usage: [{}] {}",
        key.usage(),
        key_usage_string(key.usage()).unwrap_or(key.usage())
    );
    println!(
        "Key algorithm: [{}] {}",
        key.algorithm(),
        algorithm_string(key.algorithm()).unwrap_or(key.algorithm())
    );
    println!(
        "Key mode of use: [{}] {}",
        key.mode_of_use(),
        mode_of_use_string(key.mode_of_use()).unwrap_or(key.mode_of_use())
    );
    match key.key_version() {
        KeyVersion::Unused => println!("Key version: Unused"),
        KeyVersion::ValidNumber(n) => println!("Key version: {n}"),
        KeyVersion::Component(c) => println!("Key component: {c}"),
    }
    println!(
        "Key exportability: [{}] {}",
        key.exportability(),
        exportability_string(key.exportability()).unwrap_or(key.exportability())
    );

    if header.num_optional_blocks() > 0 {
        println!("Optional blocks [{}]:", header.num_optional_blocks());
        let mut block = header.opt_blocks().as_deref();
        while let Some(opt_block) = block {
            println!(
                "\t[{}] {}: {}",
                opt_block.id(),
                opt_block_id_string(opt_block.id()).unwrap_or(opt_block.id()),
                opt_block.data()
            );
            block = opt_block.next();
        }
    }

    match key.data() {
        Some(data) => {
            println!("Key length: {}", data.len());
            match key.kcv() {
                Some(kcv) => println!(
                    "Key value: {} (KCV: {})",
                    hex::encode_upper(data),
                    hex::encode_upper(kcv)
                ),
                None => println!("Key value: {}", hex::encode_upper(data)),
            }
        }
        None => println!("Key not decrypted"),
    }
}
