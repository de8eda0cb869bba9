//! Tests fuzz safe : arrondi correct du contexte + déterminisme du moteur.
//!
//! But : marteler l’arithmétique sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - opérandes bornés (≤ 30 chiffres, exposants écartés pour forcer l’unité collante)
//! - budget temps global
//! - invariant clé : résultat exact à une demi-unité près (troncature : une unité, vers zéro)

use std::time::{Duration, Instant};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::contexte::{Arrondi, Contexte};
use super::decimal::{pow10, Decimal};
use super::gauss_legendre::compute_pi;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération ------------------------ */

fn gen_decimal(rng: &mut Rng, non_nul: bool) -> Decimal {
    let longueur = 1 + rng.pick(30) as usize;
    let mut chiffres = String::with_capacity(longueur);
    for i in 0..longueur {
        // tête non nulle si demandé
        let d = if i == 0 && non_nul {
            1 + rng.pick(9)
        } else {
            rng.pick(10)
        };
        chiffres.push(char::from(b'0' + d as u8));
    }

    let mut coeff: BigInt = chiffres.parse().unwrap();
    if rng.coin() {
        coeff = -coeff;
    }
    let exp = rng.pick(81) as i64 - 40;
    Decimal::new(coeff, exp)
}

fn gen_contexte(rng: &mut Rng) -> Contexte {
    let precision = 1 + rng.pick(40) as u64;
    let arrondi = match rng.pick(3) {
        0 => Arrondi::DemiPair,
        1 => Arrondi::DemiHaut,
        _ => Arrondi::VersZero,
    };
    Contexte::avec_arrondi(precision, arrondi).unwrap()
}

/// Unité du dernier chiffre conservé de `r`.
fn ulp(r: &Decimal, precision: u64) -> BigRational {
    Decimal::new(1, r.exposant_ajuste() - precision as i64 + 1).to_rational()
}

fn verifie_arrondi(ctx: &Contexte, mode: Arrondi, exact: &BigRational, r: &Decimal, quoi: &str) {
    assert!(
        r.chiffres() <= ctx.precision(),
        "{quoi}: {} chiffres > {}",
        r.chiffres(),
        ctx.precision()
    );

    let obtenu = r.to_rational();
    let erreur = (exact - &obtenu).abs();
    if erreur.is_zero() {
        return;
    }

    let u = ulp(r, ctx.precision());
    match mode {
        Arrondi::DemiPair | Arrondi::DemiHaut => {
            let deux = BigRational::from_integer(BigInt::from(2));
            assert!(erreur * deux <= u, "{quoi}: erreur > ulp/2 (r={r})");
        }
        Arrondi::VersZero => {
            assert!(erreur < u, "{quoi}: erreur ≥ ulp (r={r})");
            assert!(obtenu.abs() <= exact.abs(), "{quoi}: troncature vers le haut (r={r})");
        }
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_add_sub_mul_div_correctement_arrondis() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0xC0FFEE_u64);

    for _ in 0..1500 {
        budget(t0, max);

        let ctx = gen_contexte(&mut rng);
        let mode = ctx.arrondi();
        let x = gen_decimal(&mut rng, false);
        let y = gen_decimal(&mut rng, true);
        let (qx, qy) = (x.to_rational(), y.to_rational());

        let cas = format!("x={x} y={y} p={} {mode:?}", ctx.precision());

        verifie_arrondi(&ctx, mode, &(&qx + &qy), &ctx.add(&x, &y), &format!("add {cas}"));
        verifie_arrondi(&ctx, mode, &(&qx - &qy), &ctx.sub(&x, &y), &format!("sub {cas}"));
        verifie_arrondi(&ctx, mode, &(&qx * &qy), &ctx.mul(&x, &y), &format!("mul {cas}"));

        let q = ctx
            .div(&x, &y)
            .unwrap_or_else(|e| panic!("div {cas} err={e}"));
        verifie_arrondi(&ctx, mode, &(&qx / &qy), &q, &format!("div {cas}"));
    }
}

#[test]
fn fuzz_safe_racine_encadree() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..600 {
        budget(t0, max);

        let ctx = gen_contexte(&mut rng);
        let x = gen_decimal(&mut rng, true).abs();
        let r = ctx
            .sqrt(&x)
            .unwrap_or_else(|e| panic!("sqrt x={x} err={e}"));

        assert!(r.chiffres() <= ctx.precision(), "sqrt x={x} r={r}");

        // toujours demi-pair : (r - u/2)² ≤ x ≤ (r + u/2)²
        let demi = ulp(&r, ctx.precision()) / BigInt::from(2);
        let qr = r.to_rational();
        let qx = x.to_rational();
        let bas = &qr - &demi;
        let haut = &qr + &demi;
        assert!(&bas * &bas <= qx, "sqrt x={x} r={r} trop grand");
        assert!(&haut * &haut >= qx, "sqrt x={x} r={r} trop petit");
    }
}

#[test]
fn fuzz_safe_exposants_tres_ecartes() {
    // l’opérande minuscule ne doit jamais être déroulé en entier géant
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut rng = Rng::new(0x5EED_u64);
    for _ in 0..200 {
        budget(t0, max);

        let ctx = gen_contexte(&mut rng);
        let x = gen_decimal(&mut rng, true);
        let ecart = 1_000_000 + rng.pick(1_000_000) as i64;
        let y = Decimal::new(1 + rng.pick(9), x.exposant() - ecart);

        let s = ctx.add(&x, &y);
        assert!(s.chiffres() <= ctx.precision());
        // la somme reste à moins d’une unité de x arrondi
        let xr = ctx.arrondir(&x);
        let diff = ctx.sub(&s, &xr).abs();
        assert!(diff <= Decimal::new(1, xr.exposant_ajuste() - ctx.precision() as i64 + 1));
    }
}

#[test]
fn fuzz_safe_moteur_determinisme_et_plafond() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0x314159_u64);
    for _ in 0..40 {
        budget(t0, max);

        let precision = 1 + rng.pick(80) as u64;
        let iterations = rng.pick(12) as u64;
        let ctx = Contexte::new(precision).unwrap();

        let a = compute_pi(&ctx, iterations).unwrap();
        let b = compute_pi(&ctx, iterations).unwrap();
        assert_eq!(a.to_string(), b.to_string());
        assert!(a.chiffres() <= precision);
        assert!(a.est_positif());
    }
}

#[test]
fn fuzz_safe_cache_puissances() {
    // mêmes puissances demandées dans le désordre : valeurs stables
    let mut rng = Rng::new(0xCAFE_u64);
    for _ in 0..100 {
        let n = rng.pick(300) as u64;
        let p = pow10(n);
        assert_eq!(p.to_string().len() as u64, n + 1);
        assert_eq!(pow10(n), p);
    }
}

#[test]
fn fuzz_safe_calculs_concurrents_independants() {
    // contextes distincts, seul le cache des puissances est partagé
    let cas: [(u64, u64); 4] = [(20, 3), (64, 7), (135, 4), (300, 9)];
    let attendus: Vec<String> = cas
        .iter()
        .map(|&(p, n)| compute_pi(&Contexte::new(p).unwrap(), n).unwrap().to_string())
        .collect();

    for _ in 0..3 {
        let obtenus: Vec<String> = std::thread::scope(|s| {
            let fils: Vec<_> = cas
                .iter()
                .map(|&(p, n)| {
                    s.spawn(move || {
                        let ctx = Contexte::new(p).unwrap();
                        compute_pi(&ctx, n).unwrap().to_string()
                    })
                })
                .collect();
            fils.into_iter().map(|f| f.join().unwrap()).collect()
        });
        assert_eq!(obtenus, attendus);
    }
}
