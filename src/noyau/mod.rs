//! Noyau π (Gauss–Legendre, décimal à précision arbitraire)
//!
//! Organisation interne :
//! - decimal.rs        : valeur décimale (coefficient × 10^exposant) + texte canonique
//! - contexte.rs       : précision + arrondi explicites, opérations correctement arrondies
//! - gauss_legendre.rs : moteur π (itération fixe, variante adaptative)
//! - reference.rs      : π de Machin pour vérifier les chiffres
//! - sortie.rs         : écriture de l’artefact texte
//! - erreur.rs         : erreurs typées

pub mod contexte;
pub mod decimal;
pub mod erreur;
pub mod gauss_legendre;
pub mod reference;
pub mod sortie;


#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use contexte::{Arrondi, Contexte};
pub use decimal::Decimal;
pub use erreur::ErreurPi;
pub use gauss_legendre::{compute_pi, compute_pi_adaptatif};
