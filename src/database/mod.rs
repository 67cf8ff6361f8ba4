use mongodb::{Client, Collection, Database};
use std::error::Error;

pub const NEEDS_COLLECTION: &str = "volunteer_needs";
pub const REQUESTS_COLLECTION: &str = "volunteer_requests";
pub const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool tuning
        client_options.max_pool_size = Some(20); // Max 20 concurrent connections
        client_options.min_pool_size = Some(5); // Keep 5 connections warm
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300)); // 5min idle

        // Bound tail latency on store round-trips
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("volunteerDB");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes for optimal query performance
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let needs = self
            .database()
            .collection::<mongodb::bson::Document>(NEEDS_COLLECTION);

        // Index: volunteer_needs(owner_id) - ownership-scoped listing and mutation
        let needs_owner_index = IndexModel::builder().keys(doc! { "owner_id": 1 }).build();

        match needs.create_index(needs_owner_index).await {
            Ok(_) => log::info!("   ✅ Index created: volunteer_needs(owner_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index: volunteer_needs(deadline) - upcoming listing sorts on it
        let needs_deadline_index = IndexModel::builder().keys(doc! { "deadline": 1 }).build();

        match needs.create_index(needs_deadline_index).await {
            Ok(_) => log::info!("   ✅ Index created: volunteer_needs(deadline)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let requests = self
            .database()
            .collection::<mongodb::bson::Document>(REQUESTS_COLLECTION);

        // Index: volunteer_requests(owner_id)
        let requests_owner_index = IndexModel::builder().keys(doc! { "owner_id": 1 }).build();

        match requests.create_index(requests_owner_index).await {
            Ok(_) => log::info!("   ✅ Index created: volunteer_requests(owner_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let users = self
            .database()
            .collection::<mongodb::bson::Document>(USERS_COLLECTION);

        // Index: users(email) - /jwt resolves identity by email
        let users_email_index = IndexModel::builder().keys(doc! { "email": 1 }).build();

        match users.create_index(users_email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
