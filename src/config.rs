// src/config.rs
//
// Configuration : valeurs de référence + surcharges en ligne de commande
// ----------------------------------------------------------------------
// Sans argument, le binaire reproduit exactement la référence :
// 100 010 chiffres de travail, 20 itérations, demi-pair, fichier "pi.txt".

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::noyau::{Arrondi, Contexte, ErreurPi};

/// Précision de travail de référence (chiffres significatifs).
pub const PRECISION_REFERENCE: u64 = 100_010;

/// Nombre d’itérations de référence (fixe, pas de test de convergence).
pub const ITERATIONS_REFERENCE: u64 = 20;

/// Artefact de sortie de référence.
pub const SORTIE_REFERENCE: &str = "pi.txt";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArrondi {
    DemiPair,
    DemiHaut,
    VersZero,
}

impl From<ModeArrondi> for Arrondi {
    fn from(m: ModeArrondi) -> Self {
        match m {
            ModeArrondi::DemiPair => Arrondi::DemiPair,
            ModeArrondi::DemiHaut => Arrondi::DemiHaut,
            ModeArrondi::VersZero => Arrondi::VersZero,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "pi-gauss-legendre",
    version,
    about = "Calcule π (Gauss–Legendre) en décimal et l’écrit dans un fichier texte"
)]
pub struct Config {
    /// Chiffres significatifs de travail
    #[arg(long, default_value_t = PRECISION_REFERENCE)]
    pub precision: u64,

    /// Nombre d’itérations (borne maximale avec --adaptatif)
    #[arg(long, default_value_t = ITERATIONS_REFERENCE)]
    pub iterations: u64,

    /// Mode d’arrondi de chaque opération
    #[arg(long, value_enum, default_value_t = ModeArrondi::DemiPair)]
    pub arrondi: ModeArrondi,

    /// Arrêt dès que |a - b| atteint les chiffres de bruit
    #[arg(long)]
    pub adaptatif: bool,

    /// Fichier résultat
    #[arg(long, default_value = SORTIE_REFERENCE)]
    pub sortie: PathBuf,

    /// Compare le résultat à π de Machin (journalise les chiffres justes)
    #[arg(long)]
    pub verifier: bool,
}

impl Config {
    /// Refuse les paramètres dégénérés AVANT tout calcul, puis construit le contexte.
    pub fn valider(&self) -> Result<Contexte, ErreurPi> {
        if self.iterations == 0 {
            return Err(ErreurPi::IterationsInvalides);
        }
        Contexte::avec_arrondi(self.precision, self.arrondi.into())
    }
}
