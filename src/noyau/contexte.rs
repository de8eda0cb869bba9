// src/noyau/contexte.rs
//
// Contexte arithmétique explicite (précision + arrondi)
// -----------------------------------------------------
// - remplace le contexte décimal global : chaque calcul possède le sien
// - toute opération arrondit UNE fois son résultat exact à `precision` chiffres significatifs
//   (sauf le carré : precision+3 en demi-pair, puis le contexte)
// - résultat exact : exposant “idéal” conservé (add/sub: min, mul: somme, div: différence, √: ⌊e/2⌋)
// - √ arrondit toujours demi-pair, quel que soit le mode du contexte

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use std::cmp::{max, min};

use super::decimal::{nombre_chiffres, pow10, Decimal};
use super::erreur::ErreurPi;

/// Plafond de précision (chiffres significatifs).
pub const PRECISION_MAX: u64 = 425_000_000;

/// Mode d’arrondi, fixé pour toute la durée de vie du contexte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Arrondi {
    /// Demi-pair (“banquier”) : 2.5 -> 2, 3.5 -> 4.
    #[default]
    DemiPair,
    /// Demi vers le haut (en magnitude) : 2.5 -> 3.
    DemiHaut,
    /// Troncature.
    VersZero,
}

#[derive(Clone, Debug)]
pub struct Contexte {
    precision: u64,
    arrondi: Arrondi,
}

impl Contexte {
    pub fn new(precision: u64) -> Result<Self, ErreurPi> {
        Self::avec_arrondi(precision, Arrondi::default())
    }

    pub fn avec_arrondi(precision: u64, arrondi: Arrondi) -> Result<Self, ErreurPi> {
        if precision == 0 {
            return Err(ErreurPi::PrecisionInvalide(precision));
        }
        if precision > PRECISION_MAX {
            return Err(ErreurPi::PrecisionHorsCapacite {
                demandee: precision,
                max: PRECISION_MAX,
            });
        }
        Ok(Self { precision, arrondi })
    }

    pub fn precision(&self) -> u64 {
        self.precision
    }

    pub fn arrondi(&self) -> Arrondi {
        self.arrondi
    }

    /* ------------------------ Opérations ------------------------ */

    pub fn add(&self, x: &Decimal, y: &Decimal) -> Decimal {
        if x.est_zero() || y.est_zero() {
            return self.add_avec_zero(x, y);
        }

        let (haut, bas) = if x.exp >= y.exp { (x, y) } else { (y, x) };

        // `bas` entièrement sous la position d’arrondi : remplacé par une unité “collante”
        let chiffres_haut = nombre_chiffres(haut.coeff.magnitude()) as i64;
        let chiffres_bas = nombre_chiffres(bas.coeff.magnitude()) as i64;
        let plancher = haut.exp + min(-1, chiffres_haut - self.precision as i64 - 2);

        let (coeff_bas, exp_bas) = if chiffres_bas + bas.exp - 1 < plancher {
            (BigInt::from_biguint(bas.coeff.sign(), BigUint::one()), plancher)
        } else {
            (bas.coeff.clone(), bas.exp)
        };

        let somme = decaler(&haut.coeff, (haut.exp - exp_bas) as u64) + coeff_bas;
        self.arrondir_brut(somme, exp_bas, self.arrondi)
    }

    pub fn sub(&self, x: &Decimal, y: &Decimal) -> Decimal {
        self.add(x, &-y)
    }

    pub fn mul(&self, x: &Decimal, y: &Decimal) -> Decimal {
        self.arrondir_brut(&x.coeff * &y.coeff, x.exp + y.exp, self.arrondi)
    }

    /// x² comme la puissance entière du contexte décimal : deux arrondis,
    /// d’abord à precision+3 chiffres en demi-pair, puis au contexte.
    pub fn carre(&self, x: &Decimal) -> Decimal {
        // 0² : exposant 0, quel que soit celui de x
        if x.est_zero() {
            return Decimal::zero();
        }
        let large = arrondir_a(
            &x.coeff * &x.coeff,
            2 * x.exp,
            self.precision + 3,
            Arrondi::DemiPair,
        );
        self.arrondir_brut(large.coeff, large.exp, self.arrondi)
    }

    pub fn div(&self, x: &Decimal, y: &Decimal) -> Result<Decimal, ErreurPi> {
        if y.est_zero() {
            return Err(ErreurPi::DivisionParZero);
        }

        let ideal = x.exp - y.exp;
        if x.est_zero() {
            return Ok(Decimal::new(0, ideal));
        }

        let signe = if x.coeff.sign() == y.coeff.sign() {
            Sign::Plus
        } else {
            Sign::Minus
        };
        let (mx, my) = (x.coeff.magnitude(), y.coeff.magnitude());

        // quotient sur precision+1 (ou +2) chiffres, reste ramené à un chiffre collant
        let decalage = nombre_chiffres(my) as i64 - nombre_chiffres(mx) as i64
            + self.precision as i64
            + 1;
        let mut exp = ideal - decalage;

        let (mut q, reste) = if decalage >= 0 {
            let n = mx * pow10(decalage as u64);
            (&n / my, &n % my)
        } else {
            let d = my * pow10(decalage.unsigned_abs());
            (mx / &d, mx % &d)
        };

        if !reste.is_zero() {
            if (&q % 5u32).is_zero() {
                q += 1u32;
            }
        } else {
            while exp < ideal && (&q % 10u32).is_zero() {
                q /= 10u32;
                exp += 1;
            }
        }

        Ok(self.arrondir_brut(BigInt::from_biguint(signe, q), exp, self.arrondi))
    }

    pub fn sqrt(&self, x: &Decimal) -> Result<Decimal, ErreurPi> {
        if x.est_zero() {
            return Ok(Decimal::new(0, x.exp >> 1));
        }
        if x.est_negatif() {
            return Err(ErreurPi::RacineNegative);
        }

        let prec = self.precision as i64 + 1;
        let mag = x.coeff.magnitude();
        let chiffres = nombre_chiffres(mag) as i64;

        // exposant pair, puis au moins precision+1 chiffres de racine
        let mut e = x.exp >> 1;
        let (c, l) = if (x.exp & 1) == 1 {
            (mag * 10u32, (chiffres >> 1) + 1)
        } else {
            (mag.clone(), (chiffres + 1) >> 1)
        };

        let decalage = prec - l;
        let (c, exact) = if decalage >= 0 {
            (c * pow10(2 * decalage as u64), true)
        } else {
            let d = pow10(2 * decalage.unsigned_abs());
            let exact = (&c % &d).is_zero();
            (&c / &d, exact)
        };
        e -= decalage;

        let mut n = c.sqrt();
        if exact && &n * &n == c {
            if decalage >= 0 {
                n /= pow10(decalage as u64);
            } else {
                n *= pow10(decalage.unsigned_abs());
            }
            e += decalage;
        } else if (&n % 5u32).is_zero() {
            n += 1u32;
        }

        Ok(self.arrondir_brut(BigInt::from(n), e, Arrondi::DemiPair))
    }

    /// Ramène une valeur existante dans le contexte.
    pub fn arrondir(&self, x: &Decimal) -> Decimal {
        self.arrondir_brut(x.coeff.clone(), x.exp, self.arrondi)
    }

    /* ------------------------ Internes ------------------------ */

    fn add_avec_zero(&self, x: &Decimal, y: &Decimal) -> Decimal {
        let exp = min(x.exp, y.exp);
        let non_nul = if x.est_zero() { y } else { x };
        if non_nul.est_zero() {
            return Decimal::new(0, exp);
        }

        let exp = max(exp, non_nul.exp - self.precision as i64 - 1);
        let coeff = decaler(&non_nul.coeff, (non_nul.exp - exp) as u64);
        self.arrondir_brut(coeff, exp, self.arrondi)
    }

    fn arrondir_brut(&self, coeff: BigInt, exp: i64, mode: Arrondi) -> Decimal {
        arrondir_a(coeff, exp, self.precision, mode)
    }
}

/// Arrondit coeff × 10^exp à `precision` chiffres significatifs.
fn arrondir_a(coeff: BigInt, exp: i64, precision: u64, mode: Arrondi) -> Decimal {
    let chiffres = nombre_chiffres(coeff.magnitude());
    if chiffres <= precision {
        return Decimal::new(coeff, exp);
    }

    let retire = chiffres - precision;
    let diviseur = pow10(retire);
    let (signe, mag) = (coeff.sign(), coeff.magnitude());
    let mut q = mag / &diviseur;
    let reste = mag % &diviseur;

    let monte = match mode {
        Arrondi::VersZero => false,
        Arrondi::DemiHaut => (reste << 1u32) >= diviseur,
        Arrondi::DemiPair => {
            let double = reste << 1u32;
            double > diviseur || (double == diviseur && (&q % 2u32).is_one())
        }
    };

    let mut exp = exp + retire as i64;
    if monte {
        q += 1u32;
        // 99…9 + 1 : un chiffre de trop
        if nombre_chiffres(&q) > precision {
            q /= 10u32;
            exp += 1;
        }
    }

    Decimal::new(BigInt::from_biguint(signe, q), exp)
}

fn decaler(c: &BigInt, n: u64) -> BigInt {
    if n == 0 {
        return c.clone();
    }
    c * BigInt::from(pow10(n))
}
