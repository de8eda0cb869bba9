//! π par Gauss–Legendre en décimal à précision arbitraire.
//!
//! Le binaire (`main.rs`) initialise la journalisation, lit la configuration
//! et appelle [`executer`] : calcul, vérification optionnelle, fichier résultat.

pub mod config;
pub mod noyau;

use std::time::Instant;

use tracing::{info, warn};

use config::Config;
use noyau::{compute_pi, compute_pi_adaptatif, reference, sortie, Decimal, ErreurPi};

/// Exécution complète ; renvoie la valeur écrite.
pub fn executer(config: &Config) -> Result<Decimal, ErreurPi> {
    // 1) paramètres refusés avant toute arithmétique
    let ctx = config.valider()?;

    info!(
        precision = ctx.precision(),
        iterations = config.iterations,
        arrondi = ?ctx.arrondi(),
        adaptatif = config.adaptatif,
        "calcul de π"
    );

    // 2) calcul
    let debut = Instant::now();
    let pi = if config.adaptatif {
        let (pi, k) = compute_pi_adaptatif(&ctx, config.iterations)?;
        info!(iterations = k, "arrêt adaptatif");
        pi
    } else {
        compute_pi(&ctx, config.iterations)?
    };
    info!(
        duree_ms = debut.elapsed().as_millis() as u64,
        chiffres = pi.chiffres(),
        "π calculé"
    );

    // 3) vérification optionnelle
    if config.verifier {
        let justes = reference::chiffres_corrects(&pi);
        info!(chiffres_justes = justes, chiffres = pi.chiffres(), "vérification (Machin)");
        if justes + 10 < pi.chiffres() {
            warn!(
                chiffres_justes = justes,
                "itérations insuffisantes pour la précision demandée"
            );
        }
    }

    // 4) artefact
    sortie::ecrire_resultat(&config.sortie, &pi)?;
    info!(sortie = %config.sortie.display(), "résultat écrit");

    Ok(pi)
}
