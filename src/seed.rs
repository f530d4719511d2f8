//! Demo data: the stock permission set, the four built-in roles and a few
//! users and ads to browse

use chrono::{DateTime, TimeZone, Utc};

use crate::constants::{RESOURCE_ADS, RESOURCE_ANALYTICS, RESOURCE_ROLES, RESOURCE_USERS};
use crate::models::{
    Action, Ad, AdCategory, AdStatus, Category, ContactInfo, Permission, Role, User,
};
use crate::store::Marketplace;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .unwrap_or_default()
}

// (id, name, description, resource, action)
const PERMISSIONS: &[(&str, &str, &str, &str, Action)] = &[
    ("perm1", "View Ads", "Can view all advertisements", RESOURCE_ADS, Action::Read),
    ("perm2", "Create Ads", "Can create new advertisements", RESOURCE_ADS, Action::Create),
    ("perm3", "Edit Ads", "Can edit advertisements", RESOURCE_ADS, Action::Update),
    ("perm4", "Delete Ads", "Can delete advertisements", RESOURCE_ADS, Action::Delete),
    ("perm5", "Manage Users", "Can manage user accounts", RESOURCE_USERS, Action::Manage),
    (
        "perm6",
        "Manage Roles",
        "Can manage user roles and permissions",
        RESOURCE_ROLES,
        Action::Manage,
    ),
    (
        "perm7",
        "View Analytics",
        "Can view system analytics and reports",
        RESOURCE_ANALYTICS,
        Action::Read,
    ),
];

pub fn permissions() -> Vec<Permission> {
    PERMISSIONS
        .iter()
        .map(|&(id, name, description, resource, action)| Permission {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            resource: resource.into(),
            action,
        })
        .collect()
}

fn pick(all: &[Permission], ids: &[&str]) -> Vec<Permission> {
    all.iter()
        .filter(|p| ids.contains(&p.id.as_str()))
        .cloned()
        .collect()
}

pub fn roles(all: &[Permission]) -> Vec<Role> {
    let created = at(2024, 1, 1, 0, 0);
    let role = |id: &str, name: &str, description: &str, permissions, is_default| Role {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        permissions,
        is_default,
        created_at: created,
    };
    let moderator = pick(all, &["perm1", "perm2", "perm3", "perm4"]);
    let user = pick(all, &["perm1", "perm2", "perm3"]);
    let guest = pick(all, &["perm1"]);
    vec![
        role("role1", "Admin", "Full system access with all permissions", all.to_vec(), false),
        role("role2", "Moderator", "Can manage ads and moderate content", moderator, false),
        role("role3", "User", "Standard user with basic permissions", user, true),
        role("role4", "Guest", "Limited access for unregistered users", guest, false),
    ]
}

struct SeedUser {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    location: &'static str,
    role: &'static str,
    is_active: bool,
    joined_day: u32,
    // (day, hour, minute) in January 2024
    last_login: (u32, u32, u32),
}

const USERS: &[SeedUser] = &[
    SeedUser {
        id: "user1",
        name: "John Doe",
        email: "john.doe@example.com",
        phone: "+1-555-0123",
        location: "New York, NY",
        role: "Admin",
        is_active: true,
        joined_day: 1,
        last_login: (15, 10, 30),
    },
    SeedUser {
        id: "user2",
        name: "Jane Smith",
        email: "jane.smith@example.com",
        phone: "+1-555-0124",
        location: "Los Angeles, CA",
        role: "Moderator",
        is_active: true,
        joined_day: 2,
        last_login: (14, 15, 45),
    },
    SeedUser {
        id: "user3",
        name: "Bob Johnson",
        email: "bob.johnson@example.com",
        phone: "+1-555-0125",
        location: "Chicago, IL",
        role: "User",
        is_active: true,
        joined_day: 3,
        last_login: (13, 9, 15),
    },
    SeedUser {
        id: "user4",
        name: "Alice Brown",
        email: "alice.brown@example.com",
        phone: "+1-555-0126",
        location: "Miami, FL",
        role: "User",
        is_active: false,
        joined_day: 4,
        last_login: (10, 14, 20),
    },
    SeedUser {
        id: "user5",
        name: "Charlie Wilson",
        email: "charlie.wilson@example.com",
        phone: "+1-555-0127",
        location: "Seattle, WA",
        role: "User",
        is_active: true,
        joined_day: 5,
        last_login: (12, 11, 30),
    },
];

pub fn users() -> Vec<User> {
    USERS
        .iter()
        .map(|u| {
            let (day, hour, minute) = u.last_login;
            User {
                id: u.id.into(),
                name: u.name.into(),
                email: u.email.into(),
                phone: Some(u.phone.into()),
                location: Some(u.location.into()),
                role: u.role.into(),
                is_active: u.is_active,
                created_at: at(2024, 1, u.joined_day, 0, 0),
                last_login: Some(at(2024, 1, day, hour, minute)),
            }
        })
        .collect()
}

pub fn ads() -> Vec<Ad> {
    let iphone_posted = at(2024, 1, 15, 10, 30);
    let civic_posted = at(2024, 1, 14, 15, 45);
    vec![
        Ad {
            id: "1".into(),
            title: "iPhone 13 Pro Max".into(),
            description: "Excellent condition, 256GB, Pacific Blue".into(),
            price: 899.0,
            category: AdCategory::Electronics,
            location: "New York, NY".into(),
            images: vec!["https://via.placeholder.com/300x200".into()],
            created_at: iphone_posted,
            updated_at: iphone_posted,
            user_id: "user1".into(),
            status: AdStatus::Active,
            contact_info: ContactInfo {
                email: "john.doe@example.com".into(),
                phone: Some("+1-555-0123".into()),
            },
        },
        Ad {
            id: "2".into(),
            title: "2019 Honda Civic".into(),
            description: "Low mileage, well maintained, automatic transmission".into(),
            price: 18500.0,
            category: AdCategory::Vehicles,
            location: "Los Angeles, CA".into(),
            images: vec!["https://via.placeholder.com/300x200".into()],
            created_at: civic_posted,
            updated_at: civic_posted,
            user_id: "user2".into(),
            status: AdStatus::Active,
            contact_info: ContactInfo {
                email: "jane.smith@example.com".into(),
                phone: None,
            },
        },
    ]
}

/// Browse taxonomy; names match [`AdCategory`] so they work as listing filters
pub fn categories() -> Vec<Category> {
    let cat = |id: &str, category: AdCategory, subs: &[&str]| Category {
        id: id.into(),
        name: category.as_str().into(),
        subcategories: subs.iter().map(|s| s.to_string()).collect(),
    };
    vec![
        cat("1", AdCategory::Electronics, &["Phones", "Computers", "Tablets", "Accessories"]),
        cat("2", AdCategory::Vehicles, &["Cars", "Motorcycles", "Trucks", "Boats"]),
        cat("3", AdCategory::Property, &["Apartments", "Houses", "Commercial", "Land"]),
    ]
}

/// A marketplace loaded with the demo data
pub fn marketplace() -> Marketplace {
    let permissions = permissions();
    let roles = roles(&permissions);
    let mut m = Marketplace::new();
    m.load(users(), roles, permissions, ads(), categories());
    m
}
