// src/noyau/decimal.rs
//
// Valeur décimale à précision arbitraire
// --------------------------------------
// - valeur = coefficient (BigInt signé) × 10^exposant
// - immuable : chaque opération du Contexte renvoie une nouvelle valeur
// - égalité / ordre sur la VALEUR (1.0 == 1), pas sur la représentation
// - texte canonique : règle “to-scientific-string” (plain si exposant ≤ 0 et ajusté ≥ -6)

use num_bigint::{BigInt, BigUint, Sign};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use super::erreur::ErreurPi;

#[derive(Clone, Debug)]
pub struct Decimal {
    pub(crate) coeff: BigInt,
    pub(crate) exp: i64,
}

impl Decimal {
    pub fn new(coeff: impl Into<BigInt>, exp: i64) -> Self {
        Self {
            coeff: coeff.into(),
            exp,
        }
    }

    pub fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Valeur exacte sous forme rationnelle (tests, vérifications).
    pub fn to_rational(&self) -> BigRational {
        if self.exp >= 0 {
            let n = &self.coeff * BigInt::from(pow10(self.exp as u64));
            BigRational::from_integer(n)
        } else {
            let d = BigInt::from(pow10(self.exp.unsigned_abs()));
            BigRational::new(self.coeff.clone(), d)
        }
    }

    pub fn coefficient(&self) -> &BigInt {
        &self.coeff
    }

    pub fn exposant(&self) -> i64 {
        self.exp
    }

    pub fn est_zero(&self) -> bool {
        self.coeff.is_zero()
    }

    /// Strictement positif.
    pub fn est_positif(&self) -> bool {
        self.coeff.is_positive()
    }

    pub fn est_negatif(&self) -> bool {
        self.coeff.is_negative()
    }

    /// Nombre de chiffres du coefficient (zéro compte pour 1).
    pub fn chiffres(&self) -> u64 {
        nombre_chiffres(self.coeff.magnitude())
    }

    /// Exposant du chiffre de tête : 3.14 -> 0, 0.05 -> -2, 1.00E+3 -> 3.
    pub fn exposant_ajuste(&self) -> i64 {
        self.exp + self.chiffres() as i64 - 1
    }

    pub fn abs(&self) -> Self {
        Self::new(self.coeff.abs(), self.exp)
    }

    fn cmp_magnitude(&self, autre: &Self) -> Ordering {
        let (aj_a, aj_b) = (self.exposant_ajuste(), autre.exposant_ajuste());
        if aj_a != aj_b {
            return aj_a.cmp(&aj_b);
        }
        // même chiffre de tête : l’écart d’exposants est borné par l’écart de longueurs
        let (ma, mb) = (self.coeff.magnitude(), autre.coeff.magnitude());
        match self.exp.cmp(&autre.exp) {
            Ordering::Equal => ma.cmp(mb),
            Ordering::Greater => (ma * pow10((self.exp - autre.exp) as u64)).cmp(mb),
            Ordering::Less => ma.cmp(&(mb * pow10((autre.exp - self.exp) as u64))),
        }
    }
}

impl From<i32> for Decimal {
    fn from(v: i32) -> Self {
        Self::new(v, 0)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::new(-&self.coeff, self.exp)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        -&self
    }
}

/* ------------------------ Égalité / ordre (valeur) ------------------------ */

fn rang_signe(s: Sign) -> i8 {
    match s {
        Sign::Minus => -1,
        Sign::NoSign => 0,
        Sign::Plus => 1,
    }
}

impl Ord for Decimal {
    fn cmp(&self, autre: &Self) -> Ordering {
        let (sa, sb) = (self.coeff.sign(), autre.coeff.sign());
        if sa != sb {
            return rang_signe(sa).cmp(&rang_signe(sb));
        }
        match sa {
            Sign::NoSign => Ordering::Equal,
            Sign::Plus => self.cmp_magnitude(autre),
            Sign::Minus => self.cmp_magnitude(autre).reverse(),
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, autre: &Self) -> Option<Ordering> {
        Some(self.cmp(autre))
    }
}

impl PartialEq for Decimal {
    fn eq(&self, autre: &Self) -> bool {
        self.cmp(autre) == Ordering::Equal
    }
}

impl Eq for Decimal {}

/* ------------------------ Texte ------------------------ */

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.coeff.magnitude().to_str_radix(10);
        let longueur = s.len() as i64;
        let gauche = self.exp + longueur;

        // position du point : plain si possible, sinon un seul chiffre avant le point
        let point = if self.exp <= 0 && gauche > -6 {
            gauche
        } else {
            1
        };

        let mut out = String::with_capacity(s.len() + 16);
        if self.coeff.is_negative() {
            out.push('-');
        }

        if point <= 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take((-point) as usize));
            out.push_str(&s);
        } else if point >= longueur {
            out.push_str(&s);
            out.extend(std::iter::repeat('0').take((point - longueur) as usize));
        } else {
            out.push_str(&s[..point as usize]);
            out.push('.');
            out.push_str(&s[point as usize..]);
        }

        if gauche != point {
            out.push_str(&format!("E{:+}", gauche - point));
        }

        f.write_str(&out)
    }
}

impl FromStr for Decimal {
    type Err = ErreurPi;

    /// Littéraux : "0.25", "-1.5E+3", "4", ".5", "1e-7".
    fn from_str(texte: &str) -> Result<Self, Self::Err> {
        let invalide = || ErreurPi::LitteralInvalide(texte.to_string());

        let t = texte.trim();
        let (negatif, t) = match t.as_bytes().first() {
            Some(b'-') => (true, &t[1..]),
            Some(b'+') => (false, &t[1..]),
            _ => (false, t),
        };

        let (mantisse, exp_txt) = match t.find(['e', 'E']) {
            Some(i) => (&t[..i], Some(&t[i + 1..])),
            None => (t, None),
        };

        let (entier, frac) = match mantisse.split_once('.') {
            Some((e, f)) => (e, f),
            None => (mantisse, ""),
        };

        let chiffres = format!("{entier}{frac}");
        if chiffres.is_empty() || !chiffres.bytes().all(|c| c.is_ascii_digit()) {
            return Err(invalide());
        }

        let mut exp: i64 = match exp_txt {
            Some(e) => e.parse().map_err(|_| invalide())?,
            None => 0,
        };
        exp = exp
            .checked_sub(frac.len() as i64)
            .ok_or_else(invalide)?;

        let mag: BigUint = chiffres.parse().map_err(|_| invalide())?;
        let signe = if negatif { Sign::Minus } else { Sign::Plus };
        Ok(Self::new(BigInt::from_biguint(signe, mag), exp))
    }
}

/* ------------------------ Puissances de 10 (cache) ------------------------ */

/// Au-delà, on vide la table (les précisions extrêmes produisent des puissances énormes).
const CACHE_PUISSANCES_MAX: usize = 512;

static PUISSANCES_10: OnceLock<Mutex<HashMap<u64, BigUint>>> = OnceLock::new();

/// 10^n (mémoïsé au-delà de u64).
pub(crate) fn pow10(n: u64) -> BigUint {
    if n < 20 {
        return BigUint::from(10u64.pow(n as u32));
    }

    let m = PUISSANCES_10.get_or_init(|| Mutex::new(HashMap::new()));
    // table en lecture seule côté valeurs : un verrou empoisonné reste exploitable
    let mut table = m.lock().unwrap_or_else(|e| e.into_inner());

    if let Some(v) = table.get(&n) {
        return v.clone();
    }

    let v = num_traits::pow(BigUint::from(10u32), n as usize);
    if table.len() >= CACHE_PUISSANCES_MAX {
        table.clear();
    }
    table.insert(n, v.clone());
    v
}

/// Minorant de log10(2) (0.30102999566398…).
const LOG10_2_NUM: u128 = 30_102_999_566;
const LOG10_2_DEN: u128 = 100_000_000_000;

/// Nombre de chiffres décimaux de `n` (sans conversion en texte).
pub(crate) fn nombre_chiffres(n: &BigUint) -> u64 {
    if n.is_zero() {
        return 1;
    }
    if n.is_one() {
        return 1;
    }

    // 2^(bits-1) <= n < 2^bits, log10(2) minoré : l’estimation ne dépasse jamais,
    // elle manque au plus de deux chiffres
    let bits = n.bits();
    let mut chiffres = ((bits - 1) as u128 * LOG10_2_NUM / LOG10_2_DEN) as u64 + 1;
    while *n >= pow10(chiffres) {
        chiffres += 1;
    }
    chiffres
}
