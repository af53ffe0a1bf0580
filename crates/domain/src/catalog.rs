//! Static syllabus catalog
//!
//! The fourteen chapters and their theorems that the seeder writes into an
//! empty store. Order within a chapter is the theorem's `order_index`.

use std::collections::HashSet;

use crate::constants::CHAPTER_COUNT;
use crate::errors::{Result, StudySyncError};

/// Chapter entry in the static catalog
#[derive(Debug, Clone, Copy)]
pub struct CatalogChapter {
    pub number: u8,
    pub title: &'static str,
    pub theorems: &'static [CatalogTheorem],
}

/// Theorem entry in the static catalog
#[derive(Debug, Clone, Copy)]
pub struct CatalogTheorem {
    pub name: &'static str,
    pub statement: &'static str,
}

const fn thm(name: &'static str, statement: &'static str) -> CatalogTheorem {
    CatalogTheorem { name, statement }
}

static SYLLABUS: [CatalogChapter; CHAPTER_COUNT] = [
    CatalogChapter {
        number: 1,
        title: "The Real Numbers",
        theorems: &[
            thm(
                "Least Upper Bound Property",
                "Every nonempty subset of R that is bounded above has a supremum in R.",
            ),
            thm(
                "Archimedean Property",
                "For every real x there is a natural number n with n > x.",
            ),
            thm(
                "Density of the Rationals",
                "Between any two distinct real numbers there is a rational number.",
            ),
            thm(
                "Irrationality of the Square Root of Two",
                "There is no rational number whose square is 2.",
            ),
        ],
    },
    CatalogChapter {
        number: 2,
        title: "Sequences and Limits",
        theorems: &[
            thm(
                "Uniqueness of Limits",
                "A convergent sequence of real numbers has exactly one limit.",
            ),
            thm(
                "Algebraic Limit Theorem",
                "Limits of convergent sequences respect sums, products and quotients with \
                 nonzero limit.",
            ),
            thm(
                "Squeeze Theorem",
                "If a_n <= b_n <= c_n and a_n, c_n both converge to L, then b_n converges to L.",
            ),
            thm(
                "Monotone Convergence Theorem",
                "A bounded monotone sequence of real numbers converges.",
            ),
        ],
    },
    CatalogChapter {
        number: 3,
        title: "Subsequences and Cauchy Sequences",
        theorems: &[
            thm(
                "Bolzano-Weierstrass Theorem",
                "Every bounded sequence of real numbers has a convergent subsequence.",
            ),
            thm(
                "Cauchy Criterion",
                "A sequence of real numbers converges if and only if it is a Cauchy sequence.",
            ),
            thm(
                "Subsequence Limits",
                "Every subsequence of a convergent sequence converges to the same limit.",
            ),
        ],
    },
    CatalogChapter {
        number: 4,
        title: "Infinite Series",
        theorems: &[
            thm(
                "Comparison Test",
                "If 0 <= a_n <= b_n and the series of b_n converges, then the series of a_n \
                 converges.",
            ),
            thm(
                "Ratio Test",
                "If lim |a_(n+1)/a_n| < 1 the series of a_n converges absolutely.",
            ),
            thm(
                "Alternating Series Test",
                "If a_n decreases to 0, the alternating series of (-1)^n a_n converges.",
            ),
            thm(
                "Absolute Convergence Implies Convergence",
                "If the series of |a_n| converges then the series of a_n converges.",
            ),
        ],
    },
    CatalogChapter {
        number: 5,
        title: "Topology of the Real Line",
        theorems: &[
            thm(
                "Nested Interval Property",
                "A nested sequence of closed bounded nonempty intervals has nonempty \
                 intersection.",
            ),
            thm(
                "Heine-Borel Theorem",
                "A subset of R is compact if and only if it is closed and bounded.",
            ),
            thm(
                "Open Sets Under Unions",
                "Arbitrary unions and finite intersections of open sets are open.",
            ),
        ],
    },
    CatalogChapter {
        number: 6,
        title: "Limits of Functions and Continuity",
        theorems: &[
            thm(
                "Sequential Criterion for Continuity",
                "f is continuous at c if and only if f(x_n) -> f(c) for every sequence \
                 x_n -> c in the domain.",
            ),
            thm(
                "Composition of Continuous Functions",
                "The composition of continuous functions is continuous.",
            ),
            thm(
                "Continuity of Polynomials",
                "Every polynomial function is continuous on R.",
            ),
        ],
    },
    CatalogChapter {
        number: 7,
        title: "Properties of Continuous Functions",
        theorems: &[
            thm(
                "Intermediate Value Theorem",
                "A continuous function on [a, b] takes every value between f(a) and f(b).",
            ),
            thm(
                "Extreme Value Theorem",
                "A continuous function on a compact set attains a maximum and a minimum.",
            ),
            thm(
                "Uniform Continuity on Compact Sets",
                "A continuous function on a compact set is uniformly continuous.",
            ),
        ],
    },
    CatalogChapter {
        number: 8,
        title: "Differentiation",
        theorems: &[
            thm(
                "Differentiability Implies Continuity",
                "If f is differentiable at c then f is continuous at c.",
            ),
            thm(
                "Chain Rule",
                "If g is differentiable at c and f at g(c), then (f o g)'(c) = f'(g(c)) g'(c).",
            ),
            thm(
                "Interior Extremum Theorem",
                "If f attains an extremum at an interior point c and f'(c) exists, then \
                 f'(c) = 0.",
            ),
            thm(
                "Darboux's Theorem",
                "A derivative has the intermediate value property.",
            ),
        ],
    },
    CatalogChapter {
        number: 9,
        title: "Mean Value Theorems",
        theorems: &[
            thm(
                "Rolle's Theorem",
                "If f is continuous on [a, b], differentiable on (a, b) and f(a) = f(b), \
                 then f'(c) = 0 for some c in (a, b).",
            ),
            thm(
                "Mean Value Theorem",
                "If f is continuous on [a, b] and differentiable on (a, b), then \
                 f'(c) = (f(b) - f(a)) / (b - a) for some c in (a, b).",
            ),
            thm(
                "L'Hopital's Rule",
                "For 0/0 indeterminate forms, lim f/g = lim f'/g' whenever the latter exists.",
            ),
        ],
    },
    CatalogChapter {
        number: 10,
        title: "Sequences and Series of Functions",
        theorems: &[
            thm(
                "Continuous Limit Theorem",
                "A uniform limit of continuous functions is continuous.",
            ),
            thm(
                "Weierstrass M-Test",
                "If |f_n(x)| <= M_n and the series of M_n converges, the series of f_n \
                 converges uniformly.",
            ),
            thm(
                "Differentiable Limit Theorem",
                "If f_n' converge uniformly and f_n converge at a point, the limit is \
                 differentiable with derivative lim f_n'.",
            ),
        ],
    },
    CatalogChapter {
        number: 11,
        title: "Power Series",
        theorems: &[
            thm(
                "Radius of Convergence",
                "A power series converges absolutely inside its radius of convergence and \
                 diverges outside it.",
            ),
            thm(
                "Term-by-Term Differentiation",
                "A power series is differentiable inside its interval of convergence and may \
                 be differentiated term by term.",
            ),
            thm(
                "Abel's Theorem",
                "If a power series converges at an endpoint, it converges uniformly on the \
                 closed interval up to that endpoint.",
            ),
        ],
    },
    CatalogChapter {
        number: 12,
        title: "The Riemann Integral",
        theorems: &[
            thm(
                "Integrability Criterion",
                "f is integrable on [a, b] if and only if for every e > 0 there is a \
                 partition with U(f, P) - L(f, P) < e.",
            ),
            thm(
                "Continuous Functions Are Integrable",
                "A continuous function on [a, b] is Riemann integrable.",
            ),
            thm(
                "Integrable Limit Theorem",
                "A uniform limit of integrable functions is integrable and the integrals \
                 converge.",
            ),
        ],
    },
    CatalogChapter {
        number: 13,
        title: "The Fundamental Theorem of Calculus",
        theorems: &[
            thm(
                "Fundamental Theorem of Calculus, Part I",
                "If F' = f on [a, b] and f is integrable, the integral of f over [a, b] is \
                 F(b) - F(a).",
            ),
            thm(
                "Fundamental Theorem of Calculus, Part II",
                "If f is integrable, G(x) = integral of f from a to x is continuous, and \
                 G'(c) = f(c) wherever f is continuous.",
            ),
            thm(
                "Integration by Parts",
                "The integral of f g' equals f g evaluated at the endpoints minus the \
                 integral of f' g.",
            ),
        ],
    },
    CatalogChapter {
        number: 14,
        title: "Metric Spaces",
        theorems: &[
            thm(
                "Compactness in Metric Spaces",
                "A metric space is compact if and only if it is sequentially compact.",
            ),
            thm(
                "Contraction Mapping Theorem",
                "A contraction on a complete metric space has a unique fixed point.",
            ),
            thm(
                "Baire Category Theorem",
                "A complete metric space is not a countable union of nowhere-dense sets.",
            ),
        ],
    },
];

/// The fixed syllabus in chapter order.
pub fn syllabus() -> &'static [CatalogChapter] {
    &SYLLABUS
}

/// Check the shape the seeder relies on.
///
/// # Errors
/// Returns `StudySyncError::Internal` when the catalog does not have exactly
/// fourteen chapters numbered 1..=14, or when a chapter has no theorems or a
/// blank name/statement.
pub fn validate(chapters: &[CatalogChapter]) -> Result<()> {
    if chapters.len() != CHAPTER_COUNT {
        return Err(StudySyncError::Internal(format!(
            "catalog has {} chapters, expected {CHAPTER_COUNT}",
            chapters.len()
        )));
    }

    let mut seen = HashSet::new();
    for chapter in chapters {
        if !(1..=14).contains(&chapter.number) || !seen.insert(chapter.number) {
            return Err(StudySyncError::Internal(format!(
                "catalog chapter number {} is out of range or duplicated",
                chapter.number
            )));
        }
        if chapter.title.trim().is_empty() {
            return Err(StudySyncError::Internal(format!(
                "catalog chapter {} has an empty title",
                chapter.number
            )));
        }
        if chapter.theorems.is_empty() {
            return Err(StudySyncError::Internal(format!(
                "catalog chapter {} has no theorems",
                chapter.number
            )));
        }
        if let Some(blank) = chapter
            .theorems
            .iter()
            .position(|t| t.name.trim().is_empty() || t.statement.trim().is_empty())
        {
            return Err(StudySyncError::Internal(format!(
                "catalog chapter {} theorem #{blank} is blank",
                chapter.number
            )));
        }
    }

    Ok(())
}
