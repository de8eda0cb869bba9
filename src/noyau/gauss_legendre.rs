// src/noyau/gauss_legendre.rs
//
// Moteur π : itération de Gauss–Legendre (moyenne arithmético-géométrique)
// ------------------------------------------------------------------------
//   a0 = 1, b0 = 1/√2, t0 = 1/4, p0 = 1
//   a' = (a+b)/2 ; b' = √(a·b) ; t' = t - p·(a-a')² ; p' = 2p
//   π ≈ (a+b)² / (4t)
//
// - mise à jour “simultanée” : les quatre valeurs suivantes sont calculées
//   depuis l’état COURANT, puis validées ensemble (b' utilise l’ancien a)
// - nombre d’itérations FIXE par défaut ; arrêt adaptatif seulement sur demande
// - aucune précision globale : tout passe par le Contexte reçu

use tracing::{debug, trace};

use super::contexte::Contexte;
use super::decimal::Decimal;
use super::erreur::ErreurPi;

/// État (a, b, t, p) au début de l’itération `k` ; invariant : p = 2^k (tant que 2^k tient dans la précision).
#[derive(Clone, Debug)]
pub struct EtatGaussLegendre {
    pub k: u64,
    pub a: Decimal,
    pub b: Decimal,
    pub t: Decimal,
    pub p: Decimal,
}

pub struct GaussLegendre<'c> {
    ctx: &'c Contexte,
    etat: EtatGaussLegendre,
}

impl<'c> GaussLegendre<'c> {
    pub fn new(ctx: &'c Contexte) -> Result<Self, ErreurPi> {
        let un = Decimal::from(1);
        let b = ctx.div(&un, &ctx.sqrt(&Decimal::from(2))?)?;
        // 1/4 exact, jamais ramené au contexte (même à 1 chiffre)
        let t = Decimal::new(25, -2);

        Ok(Self {
            ctx,
            etat: EtatGaussLegendre {
                k: 0,
                a: un.clone(),
                b,
                t,
                p: un,
            },
        })
    }

    pub fn etat(&self) -> &EtatGaussLegendre {
        &self.etat
    }

    /// Une itération.
    pub fn pas(&mut self) -> Result<(), ErreurPi> {
        let ctx = self.ctx;
        let deux = Decimal::from(2);
        let EtatGaussLegendre { k, a, b, t, p } = &self.etat;

        // tout depuis l’état courant, rien n’est écrasé avant la fin
        let a_suiv = ctx.div(&ctx.add(a, b), &deux)?;
        let b_suiv = ctx.sqrt(&ctx.mul(a, b))?;
        let correction = ctx.mul(p, &ctx.carre(&ctx.sub(a, &a_suiv)));
        let t_suiv = ctx.sub(t, &correction);
        let p_suiv = ctx.mul(p, &deux);
        let k_suiv = k + 1;

        trace!(
            k = *k,
            correction_exposant = correction.exposant_ajuste(),
            "itération Gauss–Legendre"
        );

        self.etat = EtatGaussLegendre {
            k: k_suiv,
            a: a_suiv,
            b: b_suiv,
            t: t_suiv,
            p: p_suiv,
        };
        Ok(())
    }

    /// |a - b| : écart entre les deux moyennes.
    pub fn ecart(&self) -> Decimal {
        self.ctx.sub(&self.etat.a, &self.etat.b).abs()
    }

    /// (a+b)² / (4t) sur l’état courant.
    pub fn resultat(&self) -> Result<Decimal, ErreurPi> {
        let ctx = self.ctx;
        let EtatGaussLegendre { a, b, t, .. } = &self.etat;
        let numerateur = ctx.carre(&ctx.add(a, b));
        let denominateur = ctx.mul(&Decimal::from(4), t);
        ctx.div(&numerateur, &denominateur)
    }
}

/// Suite infinie des états APRÈS chaque itération.
impl Iterator for GaussLegendre<'_> {
    type Item = Result<EtatGaussLegendre, ErreurPi>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.pas().map(|()| self.etat.clone()))
    }
}

/// π avec un nombre d’itérations fixe (0 = formule finale sur l’état initial).
pub fn compute_pi(ctx: &Contexte, iterations: u64) -> Result<Decimal, ErreurPi> {
    debug!(
        precision = ctx.precision(),
        iterations,
        arrondi = ?ctx.arrondi(),
        "Gauss–Legendre : départ"
    );

    let mut gl = GaussLegendre::new(ctx)?;
    for _ in 0..iterations {
        gl.pas()?;
    }
    let pi = gl.resultat()?;

    debug!(chiffres = pi.chiffres(), "Gauss–Legendre : terminé");
    Ok(pi)
}

/// Variante adaptative : s’arrête dès que |a - b| ≤ 10^(2 - precision), au plus `max_iterations`.
/// Renvoie (π, itérations effectuées).
pub fn compute_pi_adaptatif(ctx: &Contexte, max_iterations: u64) -> Result<(Decimal, u64), ErreurPi> {
    let seuil = Decimal::new(1, 2 - ctx.precision() as i64);

    let mut gl = GaussLegendre::new(ctx)?;
    while gl.etat().k < max_iterations {
        gl.pas()?;
        if gl.ecart() <= seuil {
            break;
        }
    }

    let k = gl.etat().k;
    debug!(iterations = k, max_iterations, "Gauss–Legendre : convergence");
    Ok((gl.resultat()?, k))
}
