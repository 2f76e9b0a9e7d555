mod common;

use axum::http::StatusCode;
use common::{add_medicine, get, post_form, setup_app};

#[tokio::test]
async fn test_add_medicine_derives_seasonal_tag() {
    let t = setup_app().await;

    let (status, body) = post_form(
        &t.app,
        "/inventory/add",
        &[
            ("name", "Benadryl Cough 100ml"),
            ("manufacturer", "J&J"),
            ("category", "Cough Syrup"),
            ("price", "85.5"),
            ("stock_quantity", "40"),
            ("expiry_date", "2030-01-31"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["seasonal_tag"], "Winter");
    assert_eq!(body["price"], "85.50");
    assert_eq!(body["expiry_date"], "2030-01-31");
    assert_eq!(body["manufacturer"], "J&J");

    let id = body["id"].as_i64().unwrap();
    let (status, fetched) = get(&t.app, &format!("/api/medicine/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Benadryl Cough 100ml");
}

#[tokio::test]
async fn test_unlisted_category_is_untagged() {
    let t = setup_app().await;
    let id = add_medicine(&t.app, "Metformin 500mg", "Diabetes", "30", "100", "2030-06-30").await;

    let (_, body) = get(&t.app, &format!("/api/medicine/{id}")).await;
    assert!(body["seasonal_tag"].is_null());
}

#[tokio::test]
async fn test_add_rejects_bad_input() {
    let t = setup_app().await;

    let cases: [(&str, &str, &str); 5] = [
        ("abc", "10", "2030-01-01"),
        ("-5", "10", "2030-01-01"),
        ("50000000000000000", "10", "2030-01-01"),
        ("10", "ten", "2030-01-01"),
        ("10", "10", "31/01/2030"),
    ];

    for (price, stock, expiry) in cases {
        let (status, body) = post_form(
            &t.app,
            "/inventory/add",
            &[
                ("name", "Paracetamol 500mg"),
                ("manufacturer", "Cipla"),
                ("category", "Painkiller"),
                ("price", price),
                ("stock_quantity", stock),
                ("expiry_date", expiry),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "price={price} stock={stock} expiry={expiry}");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let (status, body) = post_form(&t.app, "/inventory/add", &[("price", "10")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    assert_eq!(t.db.medicines().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_sorted() {
    let t = setup_app().await;
    add_medicine(&t.app, "Paracetamol 500mg", "Painkiller", "12", "50", "2030-01-01").await;
    add_medicine(&t.app, "Azithromycin 250mg", "Antibiotic", "95", "20", "2030-01-01").await;
    add_medicine(&t.app, "Crocin Syrup", "Painkiller", "40", "5", "2030-01-01").await;

    let (status, body) = get(&t.app, "/inventory?search=para").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["medicines"][0]["name"], "Paracetamol 500mg");

    // Category match
    let (_, body) = get(&t.app, "/inventory?search=PAINKILLER").await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["medicines"][0]["name"], "Crocin Syrup");
    assert_eq!(body["medicines"][1]["name"], "Paracetamol 500mg");

    // Blank search lists everything by name
    let (_, body) = get(&t.app, "/inventory").await;
    let names: Vec<&str> = body["medicines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Azithromycin 250mg", "Crocin Syrup", "Paracetamol 500mg"]);
}

#[tokio::test]
async fn test_add_form_lists_categories() {
    let t = setup_app().await;
    let (status, body) = get(&t.app, "/inventory/add").await;
    assert_eq!(status, StatusCode::OK);

    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 18);
    assert_eq!(categories[0], "Allergy Relief");
}

#[tokio::test]
async fn test_edit_updates_and_retags() {
    let t = setup_app().await;
    let id = add_medicine(&t.app, "Otrivin", "Decongestant", "60", "15", "2030-01-01").await;

    let (status, body) = get(&t.app, &format!("/inventory/edit/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["medicine"]["seasonal_tag"], "Winter");

    let (status, body) = post_form(
        &t.app,
        &format!("/inventory/edit/{id}"),
        &[
            ("name", "Otrivin Nasal Spray"),
            ("manufacturer", "GSK"),
            ("category", "Nasal Spray"),
            ("price", "65.00"),
            ("stock_quantity", "30"),
            ("expiry_date", "2031-02-28"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Otrivin Nasal Spray");
    assert_eq!(body["seasonal_tag"], "Spring");
    assert_eq!(body["stock_quantity"], 30);
}

#[tokio::test]
async fn test_missing_medicine_is_404() {
    let t = setup_app().await;

    let (status, body) = get(&t.app, "/inventory/edit/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = post_form(
        &t.app,
        "/inventory/edit/999",
        &[
            ("name", "Ghost"),
            ("manufacturer", "None"),
            ("category", "Painkiller"),
            ("price", "1"),
            ("stock_quantity", "1"),
            ("expiry_date", "2030-01-01"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_form(&t.app, "/inventory/delete/999", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&t.app, "/api/medicine/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_removes_medicine() {
    let t = setup_app().await;
    let id = add_medicine(&t.app, "Dettol 100ml", "Antiseptic", "45", "12", "2030-01-01").await;

    let (status, body) = post_form(&t.app, &format!("/inventory/delete/{id}"), &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Medicine 'Dettol 100ml' deleted successfully");

    let (status, _) = get(&t.app, &format!("/api/medicine/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
