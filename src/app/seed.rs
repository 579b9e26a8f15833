use bson::oid::ObjectId;
use tracing::info;

use crate::model::package::NewPackage;
use crate::repository::package_repo::PackageRepository;
use crate::repository::repository_error::RepositoryResult;

fn sample(title: &str, location: &str, price: f64, description: &str, image: &str) -> NewPackage {
    NewPackage {
        title: title.to_string(),
        location: location.to_string(),
        price,
        description: description.to_string(),
        image: image.to_string(),
    }
}

/// Starter catalogue for an empty database.
pub fn sample_packages() -> Vec<NewPackage> {
    vec![
        sample(
            "Bali Paradise Adventure",
            "Bali, Indonesia",
            1299.0,
            "Experience the perfect blend of culture, adventure, and relaxation in beautiful Bali. Visit ancient temples, explore rice terraces, and unwind on pristine beaches.",
            "https://images.unsplash.com/photo-1537953773345-d172ccf13cf1?auto=format&fit=crop&w=2072&q=80",
        ),
        sample(
            "Swiss Alps Explorer",
            "Swiss Alps, Switzerland",
            2499.0,
            "Discover the majestic Swiss Alps with breathtaking mountain views, charming villages, and world-class hiking trails. Perfect for nature lovers and adventure seekers.",
            "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?auto=format&fit=crop&w=2070&q=80",
        ),
        sample(
            "Tokyo Urban Experience",
            "Tokyo, Japan",
            1899.0,
            "Immerse yourself in the vibrant culture of Tokyo. From traditional temples to modern skyscrapers, experience the perfect blend of old and new Japan.",
            "https://images.unsplash.com/photo-1540959733332-eab4deabeeaf?auto=format&fit=crop&w=2071&q=80",
        ),
        sample(
            "Santorini Sunset Getaway",
            "Santorini, Greece",
            1699.0,
            "Experience the magic of Santorini with its iconic white buildings, stunning sunsets, and crystal-clear waters. A romantic paradise in the Mediterranean.",
            "https://images.unsplash.com/photo-1570077188670-e3a8d69ac5ff?auto=format&fit=crop&w=2070&q=80",
        ),
        sample(
            "Machu Picchu Discovery",
            "Machu Picchu, Peru",
            2199.0,
            "Explore the ancient Incan citadel of Machu Picchu, one of the most impressive archaeological sites in the world. A journey through history and culture.",
            "https://images.unsplash.com/photo-1587595431973-160d0d94add1?auto=format&fit=crop&w=2070&q=80",
        ),
        sample(
            "New York City Adventure",
            "New York City, USA",
            1599.0,
            "Experience the city that never sleeps! From Times Square to Central Park, discover the energy and excitement of the Big Apple.",
            "https://images.unsplash.com/photo-1496442226666-8d4d0e62e6e9?auto=format&fit=crop&w=2070&q=80",
        ),
    ]
}

/// Inserts the sample catalogue owned by `owner` unless packages already exist.
/// Returns how many packages were inserted.
pub async fn seed_sample_packages(repo: &dyn PackageRepository, owner: ObjectId) -> RepositoryResult<usize> {
    if repo.count().await? > 0 {
        info!("Packages already present, skipping sample catalogue");
        return Ok(0);
    }
    let samples = sample_packages();
    let total = samples.len();
    for fields in samples {
        repo.insert(fields.into_package(owner)).await?;
    }
    info!("Inserted {} sample packages", total);
    Ok(total)
}
