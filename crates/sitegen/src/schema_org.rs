// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Schema.org JSON-LD blocks embedded in generated pages.

use crate::content::{FaqItem, Google};
use crate::lang::Language;
use crate::model::{Commune, Service};
use serde_json::{Value, json};

const AVAILABLE_LANGUAGES: [&str; 3] = ["French", "Dutch", "English"];

/// The business every page describes.
#[derive(Debug, Clone)]
pub struct Business {
    pub name: String,
    pub telephone: String,
    pub email: String,
    /// Homepage URL of the language being built.
    pub url: String,
    pub lang: Language,
    pub rating: Option<(String, String)>,
}

impl Business {
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}#organization", self.url)
    }

    /// Rating and review count, only when both are present.
    #[must_use]
    pub fn rating_from(google: &Google) -> Option<(String, String)> {
        if google.rating.is_empty() || google.reviews_count.is_empty() {
            None
        } else {
            Some((google.rating.clone(), google.reviews_count.clone()))
        }
    }

    fn aggregate_rating(&self) -> Option<Value> {
        self.rating.as_ref().map(|(rating, count)| {
            json!({
                "@type": "AggregateRating",
                "ratingValue": rating,
                "reviewCount": count,
                "bestRating": "5",
                "worstRating": "1"
            })
        })
    }

    fn contact_points(&self) -> Value {
        let whatsapp: String = self
            .telephone
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        json!([
            {
                "@type": "ContactPoint",
                "telephone": self.telephone,
                "contactType": "Emergency Service",
                "areaServed": "BE",
                "availableLanguage": AVAILABLE_LANGUAGES
            },
            {
                "@type": "ContactPoint",
                "telephone": self.telephone,
                "contactType": "Customer Service",
                "areaServed": "BE",
                "availableLanguage": AVAILABLE_LANGUAGES,
                "contactOption": "TollFree",
                "url": format!("https://wa.me/{whatsapp}")
            }
        ])
    }
}

fn catalog_name(lang: Language) -> &'static str {
    match lang {
        Language::Fr => "Services de dépannage automobile",
        Language::En => "Car breakdown services",
        Language::Nl => "Autopech diensten",
    }
}

/// Homepage organization with its offer catalog.
#[must_use]
pub fn organization(business: &Business, description: &str, services: &[&Service]) -> Value {
    let offers: Vec<Value> = services
        .iter()
        .map(|s| {
            json!({
                "@type": "Offer",
                "itemOffered": {
                    "@type": "Service",
                    "name": s.name,
                    "serviceType": s.service_type,
                    "description": s.meta_description
                }
            })
        })
        .collect();
    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": ["AutoRepair", "LocalBusiness"],
        "@id": business.id(),
        "name": business.name,
        "description": description,
        "url": business.url,
        "telephone": business.telephone,
        "email": business.email,
        "inLanguage": business.lang.code(),
        "areaServed": {"@type": "City", "name": "Bruxelles"},
        "contactPoint": business.contact_points(),
        "hasOfferCatalog": {
            "@type": "OfferCatalog",
            "name": catalog_name(business.lang),
            "itemListElement": offers
        }
    });
    if let Some(rating) = business.aggregate_rating() {
        schema["aggregateRating"] = rating;
    }
    schema
}

#[must_use]
pub fn service(business: &Business, service: &Service) -> Value {
    let service_type = if service.service_type.is_empty() {
        &service.name
    } else {
        &service.service_type
    };
    json!({
        "@context": "https://schema.org",
        "@type": "Service",
        "name": service.name,
        "serviceType": service_type,
        "description": service.meta_description,
        "inLanguage": business.lang.code(),
        "provider": {
            "@type": "AutoRepair",
            "@id": business.id(),
            "name": business.name,
            "telephone": business.telephone,
            "url": business.url
        },
        "areaServed": {"@type": "City", "name": "Bruxelles"},
        "availableChannel": {
            "@type": "ServiceChannel",
            "servicePhone": {
                "@type": "ContactPoint",
                "telephone": business.telephone,
                "contactType": "Emergency Service",
                "areaServed": "BE",
                "availableLanguage": AVAILABLE_LANGUAGES
            }
        }
    })
}

/// Local business scoped to one commune.
#[must_use]
pub fn commune(business: &Business, commune: &Commune, url: &str, description: &str) -> Value {
    let mut area = json!({
        "@type": "City",
        "name": commune.name,
        "addressCountry": "BE"
    });
    if !commune.postal_code.is_empty() {
        area["postalCode"] = json!(commune.postal_code);
    }
    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "AutoRepair",
        "name": format!("{} - {}", business.name, commune.name),
        "description": description,
        "telephone": business.telephone,
        "email": business.email,
        "inLanguage": business.lang.code(),
        "url": url,
        "areaServed": area,
        "parentOrganization": {
            "@type": "AutoRepair",
            "@id": business.id(),
            "name": business.name,
            "telephone": business.telephone
        },
        "contactPoint": business.contact_points()
    });
    if let Some(rating) = business.aggregate_rating() {
        schema["aggregateRating"] = rating;
    }
    schema
}

/// `items` are `(name, absolute url)` pairs, home first.
#[must_use]
pub fn breadcrumb(items: &[(String, String)]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": url
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": elements
    })
}

/// `None` when there are no questions.
#[must_use]
pub fn faq(lang: Language, items: &[FaqItem]) -> Option<Value> {
    if items.is_empty() {
        return None;
    }
    let questions: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "@type": "Question",
                "name": item.question,
                "acceptedAnswer": {"@type": "Answer", "text": item.answer}
            })
        })
        .collect();
    Some(json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "inLanguage": lang.code(),
        "mainEntity": questions
    }))
}

/// Wrap a schema in a `<script type="application/ld+json">` element.
#[must_use]
pub fn to_json_ld(schema: &Value) -> String {
    let body = serde_json::to_string_pretty(schema).unwrap_or_default();
    format!("<script type=\"application/ld+json\">\n{body}\n</script>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business() -> Business {
        Business {
            name: "Car Dépannage".into(),
            telephone: "+32 479 89 00 89".into(),
            email: "info@example.be".into(),
            url: "https://example.be/".into(),
            lang: Language::Fr,
            rating: Some(("4.9".into(), "190".into())),
        }
    }

    #[test]
    fn breadcrumb_positions_start_at_one() {
        let schema = breadcrumb(&[
            ("Accueil".into(), "https://example.be/".into()),
            ("Services".into(), "https://example.be/#services".into()),
        ]);
        assert_eq!(schema["itemListElement"][0]["position"], 1);
        assert_eq!(schema["itemListElement"][1]["item"], "https://example.be/#services");
    }

    #[test]
    fn faq_skips_empty_lists() {
        assert!(faq(Language::En, &[]).is_none());
        let item = FaqItem {
            question: "Q?".into(),
            answer: "A.".into(),
        };
        let schema = faq(Language::En, &[item]).expect("faq");
        assert_eq!(schema["inLanguage"], "en");
        assert_eq!(schema["mainEntity"][0]["acceptedAnswer"]["text"], "A.");
    }

    #[test]
    fn commune_schema_carries_rating_and_postcode() {
        let uccle: Commune = serde_json::from_value(json!({
            "id": 1, "slug": "depannage-uccle", "name": "Uccle", "postal_code": "1180"
        }))
        .expect("commune");
        let schema = commune(&business(), &uccle, "https://example.be/depannage-uccle/", "d");
        assert_eq!(schema["areaServed"]["postalCode"], "1180");
        assert_eq!(schema["aggregateRating"]["ratingValue"], "4.9");
        assert_eq!(schema["contactPoint"][1]["url"], "https://wa.me/32479890089");
    }

    #[test]
    fn json_ld_wrapper() {
        let html = to_json_ld(&json!({"a": 1}));
        assert!(html.starts_with("<script type=\"application/ld+json\">\n{"));
        assert!(html.ends_with("}\n</script>"));
    }
}
