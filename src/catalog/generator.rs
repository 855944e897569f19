use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::catalog::{CatalogError, DataProvider};
use crate::profile::{ExperienceLevel, Opportunity, Preferences, Profile, SalaryRange, WorkMode};

struct Track {
    domain: &'static str,
    skills: &'static [&'static str],
}

const TRACKS: &[Track] = &[
    Track {
        domain: "Frontend Development",
        skills: &["React", "JavaScript", "TypeScript", "CSS", "Figma"],
    },
    Track {
        domain: "Backend Development",
        skills: &["Node.js", "Python", "PostgreSQL", "AWS", "Docker"],
    },
    Track {
        domain: "Full Stack Development",
        skills: &["React", "Node.js", "JavaScript", "MongoDB", "Git"],
    },
    Track {
        domain: "Mobile Development",
        skills: &["React Native", "Flutter", "JavaScript", "Swift", "Figma"],
    },
    Track {
        domain: "Data Science",
        skills: &["Python", "Pandas", "NumPy", "SQL", "Tableau"],
    },
    Track {
        domain: "Artificial Intelligence",
        skills: &[
            "Machine Learning",
            "Deep Learning",
            "Python",
            "TensorFlow",
            "PyTorch",
        ],
    },
    Track {
        domain: "Design",
        skills: &["Figma", "Adobe XD", "Sketch", "CSS", "Prototyping"],
    },
    Track {
        domain: "Product Management",
        skills: &[
            "Product Management",
            "Agile Methodology",
            "Google Analytics",
            "Content Strategy",
            "SEO",
        ],
    },
];

const EXTRA_SKILLS: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C++",
    "Go",
    "SQL",
    "Git",
    "Docker",
    "Photoshop",
    "Illustrator",
    "UX Research",
];

const COMPANIES: &[&str] = &[
    "Microsoft",
    "Google",
    "Amazon",
    "Adobe",
    "Salesforce",
    "Stripe",
    "Zoom",
    "Notion",
    "Figma",
    "Canva",
    "Dropbox",
    "Spotify",
];

const CITIES: &[&str] = &[
    "Bangalore, India",
    "Mumbai, India",
    "Delhi, India",
    "Hyderabad, India",
    "Chennai, India",
    "Pune, India",
    "Singapore",
    "London, UK",
    "Berlin, Germany",
    "Toronto, Canada",
];

const TITLES: &[&str] = &[
    "AI-Powered Analytics Dashboard",
    "Mobile App Redesign",
    "E-commerce Platform",
    "Data Pipeline Optimization",
    "Machine Learning Model",
    "User Experience Research",
    "Cloud Migration Project",
    "Content Management System",
    "Real-time Chat Application",
    "Predictive Analytics Tool",
    "Customer Insights Platform",
];

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Ananya", "Arjun", "Priya", "Vikram", "Kavya", "Rohan", "Shreya", "Aditya", "Meera",
    "Sophia", "Daniel", "Wei", "Mei", "Carlos", "Maria", "Yuki", "Jin", "Omar", "Aisha",
];

const LAST_NAMES: &[&str] = &[
    "Sharma", "Patel", "Singh", "Kumar", "Gupta", "Reddy", "Shah", "Jain", "Smith", "Garcia",
    "Wang", "Chen", "Tanaka", "Kim", "Hassan", "Silva",
];

const DURATIONS_WEEKS: &[u32] = &[8, 10, 12, 16, 20];

/// Deterministic mock data: the same seed and counts always produce the
/// same profiles and opportunities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededGenerator {
    pub seed: u64,
    pub profile_count: usize,
    pub opportunity_count: usize,
}

impl SeededGenerator {
    pub fn new(seed: u64, profile_count: usize, opportunity_count: usize) -> Self {
        Self {
            seed,
            profile_count,
            opportunity_count,
        }
    }

    pub fn generate_profiles(&self) -> Vec<Profile> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..self.profile_count)
            .map(|idx| random_profile(&mut rng, idx))
            .collect()
    }

    pub fn generate_opportunities(&self) -> Vec<Opportunity> {
        // Separate stream so the opportunity list does not shift when the
        // profile count changes.
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(1));
        (0..self.opportunity_count)
            .map(|idx| random_opportunity(&mut rng, idx))
            .collect()
    }
}

impl DataProvider for SeededGenerator {
    fn name(&self) -> &str {
        "generated"
    }

    fn profiles(&self) -> Result<Vec<Profile>, CatalogError> {
        Ok(self.generate_profiles())
    }

    fn opportunities(&self) -> Result<Vec<Opportunity>, CatalogError> {
        Ok(self.generate_opportunities())
    }
}

fn pick<'a, T: ?Sized>(rng: &mut StdRng, items: &[&'a T]) -> &'a T {
    items[rng.gen_range(0..items.len())]
}

fn track_skills(rng: &mut StdRng, track: &Track, extra: usize) -> Vec<String> {
    let mut skills: Vec<String> = track.skills.iter().map(|s| s.to_string()).collect();
    let mut pool: Vec<&str> = EXTRA_SKILLS
        .iter()
        .copied()
        .filter(|s| !track.skills.contains(s))
        .collect();
    pool.shuffle(rng);
    skills.extend(pool.into_iter().take(extra).map(str::to_string));
    skills
}

fn random_profile(rng: &mut StdRng, idx: usize) -> Profile {
    let track = &TRACKS[rng.gen_range(0..TRACKS.len())];
    let extra = rng.gen_range(1..=2);
    let skills = track_skills(rng, track, extra);

    // 4-point GPA between 2.8 and 4.0, stored on the 10-point scale.
    let gpa = (rng.gen_range(2.8..=4.0_f64) * 100.0).round() / 100.0;
    let cgpa = (gpa * 2.5 * 100.0).round() / 100.0;

    let mut locations = vec![pick(rng, CITIES).to_string()];
    let work_mode = match rng.gen_range(0..3) {
        0 => WorkMode::Remote,
        1 => WorkMode::Hybrid,
        _ => WorkMode::Office,
    };
    if work_mode == WorkMode::Remote {
        locations.push("Remote".to_string());
    }

    let mut domains = vec![track.domain.to_string()];
    if rng.gen_bool(0.4) {
        let other = &TRACKS[rng.gen_range(0..TRACKS.len())];
        if other.domain != track.domain {
            domains.push(other.domain.to_string());
        }
    }

    let low = f64::from(rng.gen_range(20..=45_u32)) * 1000.0;
    let salary_range = SalaryRange::new(low, low + 15_000.0);

    Profile {
        id: format!("intern-{}", idx + 1),
        name: format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
        skills,
        cgpa,
        location: pick(rng, CITIES).to_string(),
        preferences: Preferences {
            locations,
            domains,
            salary_range: Some(salary_range),
            work_mode: Some(work_mode),
        },
        experience: Some(ExperienceLevel::from_years(f64::from(rng.gen_range(0..=3_u32)))),
    }
}

fn random_opportunity(rng: &mut StdRng, idx: usize) -> Opportunity {
    let track = &TRACKS[rng.gen_range(0..TRACKS.len())];
    let required_count = rng.gen_range(2..=5);
    let mut required: Vec<&str> = track.skills.to_vec();
    required.shuffle(rng);
    required.truncate(required_count);

    let is_remote = rng.gen_bool(0.4);
    let location = if is_remote {
        "Remote".to_string()
    } else {
        pick(rng, CITIES).to_string()
    };
    let weeks = DURATIONS_WEEKS[rng.gen_range(0..DURATIONS_WEEKS.len())];

    Opportunity {
        id: format!("project-{}", idx + 1),
        title: pick(rng, TITLES).to_string(),
        company: pick(rng, COMPANIES).to_string(),
        required_skills: required.into_iter().map(str::to_string).collect(),
        min_cgpa: f64::from(rng.gen_range(60..=85_u32)) / 10.0,
        location,
        is_remote,
        domain: track.domain.to_string(),
        stipend: Some(f64::from(rng.gen_range(20..=60_u32)) * 1000.0),
        duration_months: Some(weeks.div_ceil(4)),
        capacity: Some(rng.gen_range(2..=5)),
    }
}
