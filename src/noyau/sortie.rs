// src/noyau/sortie.rs
//
// Artefact de sortie : un fichier texte UTF-8 contenant UN nombre décimal
// (pas de retour à la ligne final, pas d’espaces autour).

use std::fs;
use std::path::Path;

use super::decimal::Decimal;
use super::erreur::ErreurPi;

pub fn ecrire_resultat(chemin: &Path, valeur: &Decimal) -> Result<(), ErreurPi> {
    fs::write(chemin, valeur.to_string()).map_err(|source| ErreurPi::Ecriture {
        chemin: chemin.to_path_buf(),
        source,
    })
}
