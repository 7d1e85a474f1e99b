//! Built-in reference lists for the filter pickers.

/// A named group of countries selectable as one chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeZone {
    /// Chip label
    pub name: &'static str,
    /// Member countries, as they appear in [`COUNTRIES`]
    pub countries: &'static [&'static str],
}

/// Trade-zone chips offered by the location picker.
pub const TRADE_ZONES: &[TradeZone] = &[
    TradeZone {
        name: "G7",
        countries: &[
            "Canada",
            "France",
            "Germany",
            "Italy",
            "Japan",
            "United Kingdom",
            "United States",
        ],
    },
    TradeZone {
        name: "DACH",
        countries: &["Austria", "Germany", "Switzerland"],
    },
    TradeZone {
        name: "Nordics",
        countries: &["Denmark", "Finland", "Iceland", "Norway", "Sweden"],
    },
    TradeZone {
        name: "Benelux",
        countries: &["Belgium", "Luxembourg", "Netherlands"],
    },
    TradeZone {
        name: "ANZ",
        countries: &["Australia", "New Zealand"],
    },
    TradeZone {
        name: "EU",
        countries: &[
            "Austria",
            "Belgium",
            "Bulgaria",
            "Croatia",
            "Cyprus",
            "Czech Republic",
            "Denmark",
            "Estonia",
            "Finland",
            "France",
            "Germany",
            "Greece",
            "Hungary",
            "Ireland",
            "Italy",
            "Latvia",
            "Lithuania",
            "Luxembourg",
            "Malta",
            "Netherlands",
            "Poland",
            "Portugal",
            "Romania",
            "Slovakia",
            "Slovenia",
            "Spain",
            "Sweden",
        ],
    },
    TradeZone {
        name: "APAC",
        countries: &[
            "Australia",
            "China",
            "Hong Kong",
            "India",
            "Indonesia",
            "Japan",
            "Malaysia",
            "New Zealand",
            "Philippines",
            "Singapore",
            "South Korea",
            "Taiwan",
            "Thailand",
            "Vietnam",
        ],
    },
    TradeZone {
        name: "LATAM",
        countries: &[
            "Argentina",
            "Brazil",
            "Chile",
            "Colombia",
            "Mexico",
            "Peru",
            "Uruguay",
        ],
    },
];

/// Countries offered by the location picker.
pub const COUNTRIES: &[&str] = &[
    "Argentina",
    "Australia",
    "Austria",
    "Belgium",
    "Brazil",
    "Bulgaria",
    "Canada",
    "Chile",
    "China",
    "Colombia",
    "Croatia",
    "Cyprus",
    "Czech Republic",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hong Kong",
    "Hungary",
    "Iceland",
    "India",
    "Indonesia",
    "Ireland",
    "Israel",
    "Italy",
    "Japan",
    "Latvia",
    "Lithuania",
    "Luxembourg",
    "Malaysia",
    "Malta",
    "Mexico",
    "Netherlands",
    "New Zealand",
    "Norway",
    "Peru",
    "Philippines",
    "Poland",
    "Portugal",
    "Romania",
    "Singapore",
    "Slovakia",
    "Slovenia",
    "South Africa",
    "South Korea",
    "Spain",
    "Sweden",
    "Switzerland",
    "Taiwan",
    "Thailand",
    "United Arab Emirates",
    "United Kingdom",
    "United States",
    "Uruguay",
    "Vietnam",
];

/// Cities offered by the location picker.
pub const CITIES: &[&str] = &[
    "Amsterdam",
    "Atlanta",
    "Austin",
    "Bangalore",
    "Barcelona",
    "Berlin",
    "Boston",
    "Chicago",
    "Copenhagen",
    "Dallas",
    "Denver",
    "Dubai",
    "Dublin",
    "Helsinki",
    "Hong Kong",
    "London",
    "Los Angeles",
    "Madrid",
    "Manchester",
    "Melbourne",
    "Miami",
    "Milan",
    "Munich",
    "New York",
    "Oslo",
    "Paris",
    "San Francisco",
    "Sao Paulo",
    "Seattle",
    "Singapore",
    "Stockholm",
    "Sydney",
    "Tel Aviv",
    "Tokyo",
    "Toronto",
    "Vancouver",
    "Vienna",
    "Warsaw",
    "Zurich",
];

/// Industries offered by the industry picker.
pub const INDUSTRIES: &[&str] = &[
    "Accounting",
    "Advertising",
    "Aerospace",
    "Agriculture",
    "Automotive",
    "Banking",
    "Biotechnology",
    "Construction",
    "Consulting",
    "Cybersecurity",
    "E-commerce",
    "Education",
    "Energy",
    "Fintech",
    "Food & Beverage",
    "Healthcare",
    "Hospitality",
    "Insurance",
    "Legal",
    "Logistics",
    "Manufacturing",
    "Media",
    "Non-profit",
    "Pharmaceuticals",
    "Real Estate",
    "Recruiting",
    "Retail",
    "SaaS",
    "Telecommunications",
    "Travel",
];

/// Technologies offered by the technology picker.
pub const TECHNOLOGIES: &[&str] = &[
    "AWS",
    "Azure",
    "Google Cloud",
    "HubSpot",
    "Salesforce",
    "Pipedrive",
    "Zendesk",
    "Intercom",
    "Segment",
    "Snowflake",
    "Databricks",
    "Stripe",
    "Shopify",
    "Magento",
    "WordPress",
    "React",
    "Kubernetes",
    "Datadog",
    "Slack",
    "Microsoft Teams",
    "Zoom",
    "Marketo",
    "Outreach",
    "Gong",
];

/// Look up a trade zone by name, case-insensitively.
#[must_use]
pub fn trade_zone(name: &str) -> Option<&'static TradeZone> {
    TRADE_ZONES
        .iter()
        .find(|zone| zone.name.eq_ignore_ascii_case(name.trim()))
}
