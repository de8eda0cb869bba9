// src/noyau/reference.rs
//
// π de référence (indépendant de Gauss–Legendre) + comparaison de chiffres
// -----------------------------------------------------------------------
// - Machin : π = 16·atan(1/5) - 4·atan(1/239), en entier “scalé” tronqué
// - chiffres de garde pour amortir les troncatures
// - cache par nombre de chiffres (les tests redemandent souvent la même taille)

use num_bigint::BigInt;
use num_traits::Zero;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use super::decimal::{pow10, Decimal};

const CHIFFRES_GARDE: u64 = 10;

/// atan(1/q) × scale (troncature), série : z - z³/3 + z⁵/5 - …
/// scale/q^(2k+1) est mis à jour par division entière (petit diviseur) à chaque terme.
fn arctan_inv_q_scaled(q: u32, scale: &BigInt) -> BigInt {
    let q2 = q * q;

    let mut k: u64 = 0;
    let mut positif = true;
    let mut puissance = scale / q;
    let mut somme = BigInt::zero();

    while !puissance.is_zero() {
        let terme = &puissance / (2 * k + 1);

        if positif {
            somme += &terme;
        } else {
            somme -= &terme;
        }

        puissance /= q2;
        positif = !positif;
        k += 1;
    }

    somme
}

/// floor(π × 10^decimales), à CHIFFRES_GARDE près.
fn pi_scaled_compute(decimales: u64) -> BigInt {
    let scale = BigInt::from(pow10(decimales + CHIFFRES_GARDE));

    let a = arctan_inv_q_scaled(5, &scale);
    let b = arctan_inv_q_scaled(239, &scale);

    let pi = BigInt::from(16) * a - BigInt::from(4) * b;
    pi / BigInt::from(pow10(CHIFFRES_GARDE))
}

static PI_CACHE: OnceLock<Mutex<HashMap<u64, String>>> = OnceLock::new();

/// Chiffres de π sans le point : "31415…", `chiffres` chiffres significatifs (tronqués).
fn chiffres_pi(chiffres: u64) -> String {
    let m = PI_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut table = m.lock().unwrap_or_else(|e| e.into_inner());

    if let Some(v) = table.get(&chiffres) {
        return v.clone();
    }

    let v = pi_scaled_compute(chiffres.saturating_sub(1)).to_string();
    table.insert(chiffres, v.clone());
    v
}

/// π tronqué à `chiffres` chiffres significatifs : "3.1415…".
pub fn pi_reference(chiffres: u64) -> String {
    let c = chiffres_pi(chiffres.max(1));
    if c.len() == 1 {
        return c;
    }
    format!("{}.{}", &c[..1], &c[1..])
}

/// Nombre de chiffres de tête communs entre `valeur` et π (le point n’est pas compté).
/// 0 si la valeur n’est pas de la forme 3.xxx.
pub fn chiffres_corrects(valeur: &Decimal) -> u64 {
    if !valeur.est_positif() || valeur.exposant_ajuste() != 0 {
        return 0;
    }

    let mantisse = valeur.coefficient().to_string();
    let reference = chiffres_pi(mantisse.len() as u64);

    mantisse
        .bytes()
        .zip(reference.bytes())
        .take_while(|(a, b)| a == b)
        .count() as u64
}
