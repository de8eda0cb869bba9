// src/main.rs
//
// π (Gauss–Legendre) — point d’entrée
// -----------------------------------
// But:
// - lire la configuration (valeurs de référence par défaut)
// - calculer π dans un contexte décimal explicite
// - écrire UN nombre dans le fichier de sortie
//
// Journalisation sur stderr (RUST_LOG, défaut "info") : stdout reste vide.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use pi_gauss_legendre::config::Config;
use pi_gauss_legendre::executer;

fn init_tracing() {
    let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filtre)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let config = Config::parse();

    match executer(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
