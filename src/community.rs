//! Farmer Connect mock
//!
//! Forum questions, mock forum posts, nearby farmers and marketplace listings.
//! Nothing is persisted: submissions get an ID and a timestamp and are echoed
//! back. Every function takes the clock reading and random source from the
//! caller.

use crate::random::{shuffle, RandomSource};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const ESTIMATED_RESPONSE_TIME: &str = "2-4 hours";
/// Crop interest that disables filtering
pub const ANY_CROP: &str = "All";

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const DIGITS: &[u8] = b"0123456789";

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn random_code(rng: &mut dyn RandomSource, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| char::from(alphabet[rng.index(alphabet.len())]))
        .collect()
}

/// Eight characters from A-Z and 0-9
pub fn question_id(rng: &mut dyn RandomSource) -> String {
    random_code(rng, ID_ALPHABET, 8)
}

/// "LST" followed by six digits
pub fn listing_id(rng: &mut dyn RandomSource) -> String {
    format!("LST{}", random_code(rng, DIGITS, 6))
}

// ============================================================================
// Forum
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Open,
    Answered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSubmission {
    pub farmer_name: String,
    pub location: String,
    pub category: String,
    pub question: String,
    pub crop_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostedQuestion {
    pub id: String,
    pub farmer_name: String,
    pub location: String,
    pub crop_type: String,
    pub category: String,
    pub question: String,
    pub timestamp: String,
    pub helpful_count: u32,
    pub status: PostStatus,
}

pub fn post_question(
    submission: QuestionSubmission,
    now: NaiveDateTime,
    rng: &mut dyn RandomSource,
) -> PostedQuestion {
    PostedQuestion {
        id: question_id(rng),
        farmer_name: submission.farmer_name,
        location: submission.location,
        crop_type: submission.crop_type,
        category: submission.category,
        question: submission.question,
        timestamp: format_timestamp(now),
        helpful_count: 0,
        status: PostStatus::Open,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForumPost {
    pub id: &'static str,
    pub farmer_name: &'static str,
    pub location: &'static str,
    pub crop_type: &'static str,
    pub category: &'static str,
    pub question: &'static str,
    pub timestamp: String,
    pub responses: u32,
    pub helpful_count: u32,
    pub status: PostStatus,
}

struct MockPost {
    id: &'static str,
    farmer_name: &'static str,
    location: &'static str,
    crop_type: &'static str,
    category: &'static str,
    question: &'static str,
    minutes_ago: i64,
    responses: u32,
    helpful_count: u32,
    answered: bool,
}

static MOCK_POSTS: &[MockPost] = &[
    MockPost {
        id: "Q001",
        farmer_name: "Rajesh Kumar",
        location: "Punjab",
        crop_type: "Wheat",
        category: "Disease Management",
        question: "My wheat crop is showing yellow rust symptoms. What immediate action should I take?",
        minutes_ago: 120,
        responses: 3,
        helpful_count: 12,
        answered: true,
    },
    MockPost {
        id: "Q002",
        farmer_name: "Priya Sharma",
        location: "Maharashtra",
        crop_type: "Cotton",
        category: "Pest Control",
        question: "How to control bollworm attack in cotton without using excessive pesticides?",
        minutes_ago: 300,
        responses: 7,
        helpful_count: 25,
        answered: true,
    },
    MockPost {
        id: "Q003",
        farmer_name: "Suresh Patel",
        location: "Gujarat",
        crop_type: "Groundnut",
        category: "Soil Management",
        question: "Best organic fertilizers for groundnut cultivation in sandy soil?",
        minutes_ago: 480,
        responses: 5,
        helpful_count: 18,
        answered: true,
    },
    MockPost {
        id: "Q004",
        farmer_name: "Lakshmi Devi",
        location: "Andhra Pradesh",
        crop_type: "Rice",
        category: "Water Management",
        question: "How to implement drip irrigation system for paddy cultivation?",
        minutes_ago: 30,
        responses: 1,
        helpful_count: 3,
        answered: false,
    },
    MockPost {
        id: "Q005",
        farmer_name: "Ramesh Reddy",
        location: "Karnataka",
        crop_type: "Tomato",
        category: "Market Information",
        question: "Current market rates for tomatoes in Bangalore wholesale market?",
        minutes_ago: 15,
        responses: 0,
        helpful_count: 1,
        answered: false,
    },
];

/// Five fixed posts stamped relative to `now`
pub fn forum_posts(now: NaiveDateTime) -> Vec<ForumPost> {
    MOCK_POSTS
        .iter()
        .map(|post| ForumPost {
            id: post.id,
            farmer_name: post.farmer_name,
            location: post.location,
            crop_type: post.crop_type,
            category: post.category,
            question: post.question,
            timestamp: format_timestamp(now - Duration::minutes(post.minutes_ago)),
            responses: post.responses,
            helpful_count: post.helpful_count,
            status: if post.answered { PostStatus::Answered } else { PostStatus::Open },
        })
        .collect()
}

// ============================================================================
// Nearby farmers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmerProfile {
    pub name: &'static str,
    pub location: String,
    pub crops: &'static [&'static str],
    pub experience: &'static str,
    pub specialization: &'static str,
    pub contact: &'static str,
    pub rating: f64,
    /// Display form, "7 km"
    pub distance: String,
    pub distance_km: i64,
}

struct MockFarmer {
    name: &'static str,
    crops: &'static [&'static str],
    experience: &'static str,
    specialization: &'static str,
    contact: &'static str,
    rating: f64,
    distance_km: (i64, i64),
}

static MOCK_FARMERS: &[MockFarmer] = &[
    MockFarmer {
        name: "Amit Singh",
        crops: &["Wheat", "Mustard", "Barley"],
        experience: "15 years",
        specialization: "Organic farming",
        contact: "+91 98xxx-xxxxx",
        rating: 4.8,
        distance_km: (2, 15),
    },
    MockFarmer {
        name: "Sunita Devi",
        crops: &["Rice", "Vegetables", "Pulses"],
        experience: "12 years",
        specialization: "Sustainable agriculture",
        contact: "+91 97xxx-xxxxx",
        rating: 4.6,
        distance_km: (5, 20),
    },
    MockFarmer {
        name: "Kiran Patil",
        crops: &["Cotton", "Soybean", "Maize"],
        experience: "20 years",
        specialization: "Precision farming",
        contact: "+91 96xxx-xxxxx",
        rating: 4.9,
        distance_km: (8, 25),
    },
    MockFarmer {
        name: "Deepak Yadav",
        crops: &["Sugarcane", "Wheat", "Potato"],
        experience: "18 years",
        specialization: "Water management",
        contact: "+91 95xxx-xxxxx",
        rating: 4.7,
        distance_km: (3, 12),
    },
];

/// Mock farmers placed at `location`, filtered by crop interest, random order
///
/// Distances are drawn for every farmer in table order before filtering.
pub fn nearby_farmers(
    location: &str,
    crop_interest: &str,
    rng: &mut dyn RandomSource,
) -> Vec<FarmerProfile> {
    let mut farmers: Vec<FarmerProfile> = MOCK_FARMERS
        .iter()
        .map(|f| {
            let distance_km = rng.int_inclusive(f.distance_km.0, f.distance_km.1);
            FarmerProfile {
                name: f.name,
                location: location.to_string(),
                crops: f.crops,
                experience: f.experience,
                specialization: f.specialization,
                contact: f.contact,
                rating: f.rating,
                distance: format!("{} km", distance_km),
                distance_km,
            }
        })
        .collect();

    let interest = crop_interest.trim();
    if !interest.eq_ignore_ascii_case(ANY_CROP) {
        farmers.retain(|f| f.crops.iter().any(|c| c.eq_ignore_ascii_case(interest)));
    }

    shuffle(rng, &mut farmers);
    farmers
}

// ============================================================================
// Marketplace
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ListingSubmission {
    pub farmer_name: String,
    pub contact: String,
    pub location: String,
    pub listing_type: String,
    pub item_name: String,
    pub quantity: String,
    pub description: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostedListing {
    pub id: String,
    pub farmer_name: String,
    pub contact: String,
    pub location: String,
    pub listing_type: String,
    pub item_name: String,
    pub quantity: String,
    pub price: String,
    pub description: String,
    pub timestamp: String,
    pub status: &'static str,
}

pub fn submit_listing(
    submission: ListingSubmission,
    now: NaiveDateTime,
    rng: &mut dyn RandomSource,
) -> PostedListing {
    PostedListing {
        id: listing_id(rng),
        farmer_name: submission.farmer_name,
        contact: submission.contact,
        location: submission.location,
        listing_type: submission.listing_type,
        item_name: submission.item_name,
        quantity: submission.quantity,
        price: submission.price,
        description: submission.description,
        timestamp: format_timestamp(now),
        status: "active",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedSource, StdSource};
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_id_formats() {
        let mut rng = StdSource::seeded(4);
        let qid = question_id(&mut rng);
        assert_eq!(qid.len(), 8);
        assert!(qid.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

        let lid = listing_id(&mut rng);
        assert_eq!(lid.len(), 9);
        assert!(lid.starts_with("LST"));
        assert!(lid[3..].chars().all(|c| c.is_ascii_digit()));

        assert_eq!(question_id(&mut FixedSource::low()), "AAAAAAAA");
        assert_eq!(listing_id(&mut FixedSource::high()), "LST999999");
    }

    #[test]
    fn test_forum_posts_are_relative_to_now() {
        let posts = forum_posts(noon());
        assert_eq!(posts.len(), 5);
        assert_eq!(posts[0].id, "Q001");
        assert_eq!(posts[0].timestamp, "2025-06-01 10:00:00");
        assert_eq!(posts[2].timestamp, "2025-06-01 04:00:00");
        assert_eq!(posts[4].timestamp, "2025-06-01 11:45:00");
        assert_eq!(posts[3].status, PostStatus::Open);
    }

    #[test]
    fn test_nearby_farmers_filter_and_distance() {
        let mut rng = StdSource::seeded(8);
        let all = nearby_farmers("Nashik", "All", &mut rng);
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|f| f.location == "Nashik"));

        let wheat = nearby_farmers("Nashik", "wheat", &mut rng);
        let mut names: Vec<&str> = wheat.iter().map(|f| f.name).collect();
        names.sort();
        assert_eq!(names, vec!["Amit Singh", "Deepak Yadav"]);

        assert!(nearby_farmers("Nashik", "Quinoa", &mut rng).is_empty());
    }

    #[test]
    fn test_farmer_distance_bounds() {
        let far = nearby_farmers("Pune", "Cotton", &mut FixedSource::high());
        assert_eq!(far.len(), 1);
        assert_eq!(far[0].distance, "25 km");

        let near = nearby_farmers("Pune", "Cotton", &mut FixedSource::low());
        assert_eq!(near[0].distance_km, 8);
    }

    #[test]
    fn test_post_question_echoes_submission() {
        let posted = post_question(
            QuestionSubmission {
                farmer_name: "Asha".into(),
                location: "Bihar".into(),
                category: "Pest Control".into(),
                question: "Aphids on mustard?".into(),
                crop_type: "General".into(),
            },
            noon(),
            &mut FixedSource::low(),
        );
        assert_eq!(posted.id, "AAAAAAAA");
        assert_eq!(posted.timestamp, "2025-06-01 12:00:00");
        assert_eq!(posted.status, PostStatus::Open);
    }
}
