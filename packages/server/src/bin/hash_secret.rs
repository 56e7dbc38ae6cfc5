//! Prints the Argon2 PHC hash of an admin secret.
//!
//! ```not_rust
//! cargo run --bin chatroom-hash-secret -- 'correct horse battery staple'
//! export CHATROOM_ADMIN_CLEAR_HASH='$argon2id$v=19$...'
//! ```

use chatroom_server::infrastructure::auth::hash_secret;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chatroom-hash-secret")]
#[command(about = "Hash an admin secret for CHATROOM_ADMIN_*_HASH", long_about = None)]
struct Args {
    /// The secret to hash
    secret: String,
}

fn main() {
    let args = Args::parse();
    match hash_secret(&args.secret) {
        Ok(hash) => println!("{hash}"),
        Err(e) => {
            eprintln!("Failed to hash secret: {e}");
            std::process::exit(1);
        }
    }
}
