//! # Seed Data Generator
//!
//! Populates the database with medicines and suppliers for development.
//!
//! ## Usage
//! ```bash
//! # Generate 1,000 medicines (default)
//! cargo run -p pharmacy-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p pharmacy-db --bin seed -- --count 5000
//!
//! # Specify database path
//! cargo run -p pharmacy-db --bin seed -- --db ./data/pharmacy.db
//! ```
//!
//! ## Generated Medicines
//! Each medicine has:
//! - A brand or generic name with a dosage or form variant
//! - One of 18 categories (seasonal tag derived from the category)
//! - Price: 10.00 - 500.00
//! - Stock: 0 - 200 (some land under the low-stock threshold)
//! - Expiry: 70% six months to two years out, 20% within 30 days,
//!   10% expired in the last 60 days
//!
//! Values are derived from the row index, so two runs produce the same data
//! apart from dates, which are relative to today.

use chrono::{Days, NaiveDate, Utc};
use pharmacy_core::{InventoryPolicy, Money, NewMedicine, NewSupplier};
use pharmacy_db::{Database, DbConfig};
use std::env;

/// Categories with the medicines sold under each.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Painkiller",
        &["Paracetamol", "Ibuprofen", "Aspirin", "Diclofenac", "Naproxen", "Dolo", "Crocin", "Combiflam", "Brufen", "Disprin"],
    ),
    (
        "Antibiotic",
        &["Amoxicillin", "Azithromycin", "Ciprofloxacin", "Cephalexin", "Doxycycline", "Augmentin", "Zithromax", "Erythromycin", "Clindamycin", "Metronidazole"],
    ),
    (
        "Antihistamine",
        &["Cetirizine", "Loratadine", "Fexofenadine", "Diphenhydramine", "Allegra", "Zyrtec", "Benadryl", "Claritin", "Chlorpheniramine", "Promethazine"],
    ),
    (
        "Antacid",
        &["Omeprazole", "Ranitidine", "Pantoprazole", "Esomeprazole", "Gelusil", "Eno", "Digene", "Gaviscon", "Rabeprazole", "Lansoprazole"],
    ),
    (
        "Cough Syrup",
        &["Benadryl Cough", "Ascoril", "Chericof", "Corex", "Glycodin", "Phensedyl", "Torex", "Zedex", "Grilinctus", "Cofsils"],
    ),
    (
        "Cold Relief",
        &["Sinarest", "Vicks Action", "D-Cold", "Coldact", "Wikoryl", "Cheston", "Febrex", "Okacet Cold", "Cetrizet Plus", "Montair LC"],
    ),
    (
        "Vitamin C",
        &["Limcee", "Celin", "Redoxon", "Vitamin C Tablets", "Ascorbic Acid", "C-Vit", "Cecon", "Cebion", "Citravite", "Healthvit C"],
    ),
    (
        "Antifungal",
        &["Fluconazole", "Clotrimazole", "Terbinafine", "Ketoconazole", "Candid", "Canesten", "Lamisil", "Nizoral", "Myconaz", "Fungitop"],
    ),
    (
        "Antiseptic",
        &["Dettol", "Savlon", "Betadine", "Soframycin", "Neosporin", "Boroline", "Burnol", "Povidone Iodine", "Hydrogen Peroxide", "Spirit"],
    ),
    (
        "Anti-diarrheal",
        &["Loperamide", "Imodium", "Eldoper", "Lopamide", "Pepto-Bismol", "Econorm", "Darolac", "Bifilac", "Sporlac", "Vibact"],
    ),
    (
        "Decongestant",
        &["Pseudoephedrine", "Otrivin", "Nasivion", "Xylometazoline", "Oxymetazoline", "Nasoclear", "Nasal Drops", "Sinex", "Afrin", "Sudafed"],
    ),
    (
        "Diabetes",
        &["Metformin", "Glimepiride", "Glibenclamide", "Insulin", "Januvia", "Amaryl", "Gluconorm", "Glycomet", "Diamicron", "Galvus"],
    ),
    (
        "Blood Thinner",
        &["Aspirin", "Warfarin", "Clopidogrel", "Ecosprin", "Plavix", "Disprin CV", "Deplatt", "Clopilet", "Loprin", "Cardivas"],
    ),
    (
        "Oral Rehydration",
        &["ORS", "Electral", "Pedialyte", "Enerzal", "Prolyte", "Rehydrate", "Hydralyte", "Gatorade", "Powerade", "Glucon-D"],
    ),
    (
        "Allergy Relief",
        &["Montair", "Montelukast", "Allegra M", "Levocet", "Rupanex", "Telekast", "Montina", "Airlukast", "Montek", "Singulair"],
    ),
    (
        "Eye Drops",
        &["Refresh Tears", "Moisol", "Systane", "Gentamicin", "Tobramycin", "Ciplox", "Vigamox", "Moxiflox", "Occuflox", "Floxip"],
    ),
    (
        "Nasal Spray",
        &["Flixonase", "Nasocort", "Nasonex", "Fluticasone", "Mometasone", "Rhinocort", "Beconase", "Avamys", "Dymista", "Omnaris"],
    ),
    (
        "Throat Lozenges",
        &["Strepsils", "Vicks", "Halls", "Cofsils", "Koflet", "Honitus", "Cepacol", "Chloraseptic", "Ricola", "Fisherman Friend"],
    ),
];

const MANUFACTURERS: &[&str] = &[
    "Cipla", "Sun Pharma", "Dr Reddy's", "Lupin", "Alkem", "Torrent", "Glenmark",
    "Zydus Cadila", "Mankind", "Micro Labs", "GSK", "Sanofi", "Abbott", "Pfizer",
    "Novartis", "Bayer", "Dabur", "Himalaya", "HealthKart", "P&G", "Centaur",
];

const DOSAGES: &[&str] = &["50mg", "100mg", "250mg", "500mg", "1000mg", "10ml", "100ml", "200ml"];

const FORMS: &[&str] = &["Tablet", "Capsule", "Syrup", "Suspension", "Drops", "Cream", "Ointment"];

/// (name, contact, email, address)
const SUPPLIERS: &[(&str, &str, &str, &str)] = &[
    ("MedSupply Co.", "9876543210", "contact@medsupply.com", "Mumbai, Maharashtra"),
    ("PharmaDirect Ltd.", "9876543211", "info@pharmadirect.com", "Delhi, NCR"),
    ("HealthCare Distributors", "9876543212", "sales@healthcare.com", "Bangalore, Karnataka"),
    ("Wellness Suppliers", "9876543213", "support@wellness.com", "Pune, Maharashtra"),
    ("MediQuick Traders", "9876543214", "orders@mediquick.com", "Chennai, Tamil Nadu"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 1000;
    let mut db_path = String::from("./pharmacy.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Pharmacy Inventory Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of medicines to generate (default: 1000)");
                println!("  -d, --db <PATH>    Database file path (default: ./pharmacy.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Pharmacy Inventory Seed Data Generator");
    println!("=========================================");
    println!("Database:  {}", db_path);
    println!("Medicines: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    seed_suppliers(&db).await?;

    let existing = db.medicines().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} medicines", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating medicines...");

    let policy = InventoryPolicy::default();
    let today = Utc::now().date_naive();
    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let medicine = generate_medicine(seed, today, &policy);

        if let Err(e) = db.medicines().insert(&medicine).await {
            eprintln!("Failed to insert {}: {}", medicine.name, e);
            continue;
        }

        generated += 1;

        if generated % 500 == 0 {
            println!("  Generated {} medicines...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} medicines in {:?}", generated, elapsed);
    println!(
        "  Rate: {:.0} medicines/second",
        generated as f64 / elapsed.as_secs_f64()
    );

    // Summary mirrors what the dashboard will show
    let all = db.medicines().list_all().await?;
    let low_stock = all
        .iter()
        .filter(|m| m.is_low_stock(policy.low_stock_threshold))
        .count();
    let expiring = all
        .iter()
        .filter(|m| m.is_expiring_soon(today, policy.expiry_warning_days))
        .count();
    let expired = all.iter().filter(|m| m.is_expired(today)).count();

    println!();
    println!("Database statistics");
    println!("  Total medicines: {}", all.len());
    println!("  Low stock:       {}", low_stock);
    println!("  Expiring soon:   {}", expiring);
    println!("  Expired:         {}", expired);

    println!();
    println!("Verifying search...");
    let hits = db.medicines().search("para").await?;
    println!("  Search 'para': {} results", hits.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Inserts the sample suppliers unless some already exist.
async fn seed_suppliers(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let existing = db.suppliers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} suppliers, leaving them alone", existing);
        return Ok(());
    }

    for (name, contact, email, address) in SUPPLIERS {
        db.suppliers()
            .insert(&NewSupplier {
                name: name.to_string(),
                contact: contact.to_string(),
                email: Some(email.to_string()),
                address: Some(address.to_string()),
            })
            .await?;
    }

    println!("✓ Inserted {} suppliers", SUPPLIERS.len());
    Ok(())
}

/// Generates a single medicine from its row index.
fn generate_medicine(seed: usize, today: NaiveDate, policy: &InventoryPolicy) -> NewMedicine {
    let (category, names) = CATEGORIES[seed % CATEGORIES.len()];
    let base_name = names[(seed / CATEGORIES.len()) % names.len()];

    // 60% dosage, 30% form, 10% plain
    let name = match seed % 10 {
        0..=5 => format!("{} {}", base_name, DOSAGES[(seed * 7) % DOSAGES.len()]),
        6..=8 => format!("{} {}", base_name, FORMS[(seed * 3) % FORMS.len()]),
        _ => base_name.to_string(),
    };

    let manufacturer = MANUFACTURERS[(seed * 13) % MANUFACTURERS.len()];

    // 10.00 - 500.00
    let price = Money::from_minor(1_000 + ((seed * 7_919) % 49_001) as i64);

    // 0 - 200
    let stock_quantity = ((seed * 37) % 201) as i64;

    NewMedicine {
        name,
        manufacturer: manufacturer.to_string(),
        category: category.to_string(),
        price,
        stock_quantity,
        expiry_date: generate_expiry_date(seed, today),
        seasonal_tag: policy.tag_for_category(category),
    }
}

/// 70% six months to two years out, 20% within 30 days, 10% recently expired.
fn generate_expiry_date(seed: usize, today: NaiveDate) -> NaiveDate {
    // Bucket by a different stride than the name variant so the two don't correlate
    let date = match (seed * 7) % 10 {
        0..=6 => today.checked_add_days(Days::new(180 + (seed as u64 * 31) % 551)),
        7 | 8 => today.checked_add_days(Days::new(1 + (seed as u64 * 11) % 30)),
        _ => today.checked_sub_days(Days::new(1 + (seed as u64 * 17) % 60)),
    };

    date.unwrap_or(today)
}
