//! Deterministic fake personal data for seeding.
//!
//! Names come from curated lists; emails are derived from the name plus a
//! serial so they never collide; descriptions are short random sentences.
//! Same RNG seed = same output.

use crate::rng::SeedRng;

const EMAIL_DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "example.net",
    "mail.test",
];

pub struct NameGenerator;

impl NameGenerator {
    /// Generate a full name (first + last).
    pub fn generate_full_name(rng: &mut SeedRng) -> String {
        let first_name = rng.pick(Self::first_names());
        let last_name = rng.pick(Self::last_names());
        format!("{first_name} {last_name}")
    }

    /// Email address for `name`. `serial` keeps it unique across a run.
    pub fn generate_email(rng: &mut SeedRng, name: &str, serial: u32) -> String {
        let local = name
            .split_whitespace()
            .map(|part| part.to_lowercase())
            .collect::<Vec<_>>()
            .join(".");
        let domain = rng.pick(EMAIL_DOMAINS);
        format!("{local}.{serial}@{domain}")
    }

    /// Ten-digit phone number; never starts with 0.
    pub fn generate_phone(rng: &mut SeedRng) -> String {
        rng.range_inclusive(1_000_000_000, 9_999_999_999).to_string()
    }

    /// Capitalized sentence of `words` words ending in a period.
    pub fn generate_sentence(rng: &mut SeedRng, words: usize) -> String {
        let mut sentence = (0..words)
            .map(|_| *rng.pick(Self::words()))
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(first) = sentence.get(0..1) {
            let upper = first.to_uppercase();
            sentence.replace_range(0..1, &upper);
        }
        sentence.push('.');
        sentence
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph",
            "Thomas", "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Paul",
            "Andrew", "Kevin", "Brian", "George", "Edward", "Ryan", "Jacob", "Nicholas",
            "Samuel", "Gregory", "Alexander", "Patrick", "Henry", "Peter", "Noah", "Ethan",
            "Mary", "Patricia", "Jennifer", "Linda", "Barbara", "Elizabeth", "Susan",
            "Jessica", "Sarah", "Karen", "Lisa", "Nancy", "Margaret", "Sandra", "Ashley",
            "Emily", "Donna", "Michelle", "Carol", "Amanda", "Melissa", "Rebecca", "Laura",
            "Angela", "Anna", "Emma", "Olivia", "Sofia", "Priya", "Aisha", "Mei", "Yuki",
            "Fatima", "Lucia", "Ingrid", "Amara", "Wei", "Mateo", "Omar", "Kenji", "Ravi",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
            "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
            "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
            "White", "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson", "Walker",
            "Young", "Allen", "King", "Wright", "Scott", "Nguyen", "Hill", "Flores", "Green",
            "Adams", "Nelson", "Baker", "Hall", "Rivera", "Campbell", "Mitchell", "Carter",
            "Patel", "Kim", "Chen", "Singh", "Okafor", "Tanaka", "Novak", "Larsen", "Rossi",
        ]
    }

    fn words() -> &'static [&'static str] {
        &[
            "monthly", "grocery", "payment", "online", "store", "coffee", "rent", "utility",
            "transfer", "refund", "salary", "bonus", "insurance", "subscription", "dinner",
            "travel", "fuel", "pharmacy", "books", "gym", "electric", "water", "phone",
            "invoice", "market", "weekly", "annual", "service", "repair", "gift", "tuition",
            "deposit", "cash", "card", "local", "shop", "delivery", "ticket", "hotel",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, SeedSlot};

    #[test]
    fn name_generation_is_deterministic() {
        let mut rng1 = RngBank::new(12345).for_phase(SeedSlot::Customers);
        let mut rng2 = RngBank::new(12345).for_phase(SeedSlot::Customers);

        let name1 = NameGenerator::generate_full_name(&mut rng1);
        let name2 = NameGenerator::generate_full_name(&mut rng2);

        assert_eq!(name1, name2, "Same seed should produce same name");
    }

    #[test]
    fn generates_valid_full_names() {
        let mut rng = RngBank::new(12345).for_phase(SeedSlot::Customers);

        for _ in 0..100 {
            let name = NameGenerator::generate_full_name(&mut rng);
            let parts: Vec<&str> = name.split_whitespace().collect();
            assert_eq!(parts.len(), 2, "Name should have exactly 2 parts: {}", name);
        }
    }

    #[test]
    fn emails_carry_serial() {
        let mut rng = RngBank::new(1).for_phase(SeedSlot::Customers);
        let email = NameGenerator::generate_email(&mut rng, "Ada Lovelace", 7);
        assert!(email.starts_with("ada.lovelace.7@"), "got {email}");
    }

    #[test]
    fn phones_have_ten_digits() {
        let mut rng = RngBank::new(3).for_phase(SeedSlot::Customers);
        for _ in 0..100 {
            let phone = NameGenerator::generate_phone(&mut rng);
            assert_eq!(phone.len(), 10, "got {phone}");
            assert!(phone.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn sentences_are_capitalized_with_period() {
        let mut rng = RngBank::new(5).for_phase(SeedSlot::Transactions);
        let sentence = NameGenerator::generate_sentence(&mut rng, 4);
        assert_eq!(sentence.split_whitespace().count(), 4);
        assert!(sentence.ends_with('.'));
        assert!(sentence.chars().next().unwrap().is_uppercase());
    }
}
