// src/noyau/erreur.rs
//
// Erreurs du noyau π
// ------------------
// - configuration : précision / itérations refusées AVANT tout calcul
// - arithmétique  : hors domaine (jamais atteint par Gauss–Legendre valide)
// - sortie        : écriture du fichier résultat (pas de nouvel essai)

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErreurPi {
    #[error("précision invalide : {0} chiffre(s) (minimum 1)")]
    PrecisionInvalide(u64),

    #[error("précision {demandee} hors capacité (maximum {max} chiffres)")]
    PrecisionHorsCapacite { demandee: u64, max: u64 },

    #[error("nombre d’itérations invalide : 0 (minimum 1)")]
    IterationsInvalides,

    #[error("division par zéro")]
    DivisionParZero,

    #[error("racine carrée d’un nombre négatif")]
    RacineNegative,

    #[error("littéral décimal invalide : {0:?}")]
    LitteralInvalide(String),

    #[error("écriture impossible dans {} : {source}", chemin.display())]
    Ecriture {
        chemin: PathBuf,
        #[source]
        source: io::Error,
    },
}
