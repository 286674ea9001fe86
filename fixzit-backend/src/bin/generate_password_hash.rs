use fixzit_backend::config::PasswordHashConfig;
use fixzit_backend::utils::password::{PasswordManager, PasswordPolicy};
use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let password = match env::args().nth(1) {
        // コマンドライン引数からパスワードを取得
        Some(arg) => arg,
        None => match read_password() {
            Ok(password) => password,
            Err(e) => {
                eprintln!("Error reading password: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    if password.is_empty() {
        eprintln!("Error: Password cannot be empty");
        return ExitCode::FAILURE;
    }

    let config = match PasswordHashConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = PasswordManager::new(&config, PasswordPolicy::default()).and_then(|manager| {
        if let Err(e) = manager.validate_password_strength(&password) {
            eprintln!("Warning: {}", e);
        }
        manager.hash_unchecked(&password)
    });

    match result {
        Ok(hash) => {
            println!("\n=== Password Hash Generated ===");
            println!("Hash: {}", hash);
            println!("\nTo use in .env file:");
            println!("SUPERADMIN_PASSWORD_HASH={}", hash);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error generating password hash: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// インタラクティブにパスワードを入力
fn read_password() -> io::Result<String> {
    print!("Enter password to hash: ");
    io::stdout().flush()?;

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    Ok(password.trim().to_string())
}
