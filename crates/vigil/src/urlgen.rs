//! Random URL synthesis from target templates.

use rand::Rng;

/// Alphabet for the `{text}` slot.
const TEXT_CHARS: &[u8; 37] = b"abcdefghijklmnopqrstuvwxyz0123456789-";

/// Produces one concrete request URL from a target's template.
///
/// Templates without slots pass through untouched. Slot values are drawn
/// fresh on every call; repeated occurrences of one slot within a template
/// share a single value. Dates are deliberately not calendar-checked, so a
/// February 30th can and will be synthesized.
pub fn generate(template: &str) -> String {
    if !template.contains('{') {
        return template.to_owned();
    }

    let mut rng = rand::rng();
    let year = format!("{:04}", rng.random_range(2010..=2022));
    let month = format!("{:02}", rng.random_range(1..=12));
    let day = format!("{:02}", rng.random_range(1..=30));
    let number = rng.random_range(1_000_000_000u64..9_000_000_000).to_string();
    let text = random_text(&mut rng);

    template
        .replace("{year}", &year)
        .replace("{month}", &month)
        .replace("{day}", &day)
        .replace("{number}", &number)
        .replace("{text}", &text)
}

/// Random path fragment of 3 to 10 chars over `[a-z0-9-]`.
fn random_text(rng: &mut impl Rng) -> String {
    let len = rng.random_range(3..=10);
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..TEXT_CHARS.len());
            TEXT_CHARS[idx] as char
        })
        .collect()
}
