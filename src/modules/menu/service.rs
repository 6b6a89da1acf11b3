use campuslens_auth::Role;
use campuslens_models::MenuItem;

struct MenuEntry {
    title: &'static str,
    icon: &'static str,
    color: &'static str,
    path: &'static str,
    description: &'static str,
    admin_only: bool,
}

const FACULTY_MENU: [MenuEntry; 8] = [
    MenuEntry {
        title: "Students",
        icon: "PeopleIcon",
        color: "#4568dc",
        path: "/faculty/students",
        description: "Manage and view student details",
        admin_only: false,
    },
    MenuEntry {
        title: "Achievements",
        icon: "EmojiEventsIcon",
        color: "#4caf50",
        path: "/faculty/achievements",
        description: "Track student achievements",
        admin_only: false,
    },
    MenuEntry {
        title: "Certifications",
        icon: "CardMembershipIcon",
        color: "#b06ab3",
        path: "/faculty/certifications",
        description: "Manage student certifications",
        admin_only: false,
    },
    MenuEntry {
        title: "Admissions",
        icon: "SchoolIcon",
        color: "#2196f3",
        path: "/faculty/admissions",
        description: "View admissions analytics",
        admin_only: false,
    },
    MenuEntry {
        title: "Reports",
        icon: "AssessmentIcon",
        color: "#ff9800",
        path: "/faculty/reports",
        description: "Generate and view reports",
        admin_only: false,
    },
    MenuEntry {
        title: "Counseling",
        icon: "ChatIcon",
        color: "#2196f3",
        path: "/faculty/counseling",
        description: "Student counseling notes",
        admin_only: false,
    },
    MenuEntry {
        title: "Calendar",
        icon: "CalendarMonthIcon",
        color: "#f44336",
        path: "/faculty/calendar",
        description: "View academic calendar",
        admin_only: false,
    },
    MenuEntry {
        title: "Calendar Admin",
        icon: "EditIcon",
        color: "#2196f3",
        path: "/faculty/calendar-admin",
        description: "Manage academic calendar",
        admin_only: true,
    },
];

pub struct MenuService;

impl MenuService {
    /// The faculty portal menu as seen by `role`.
    pub fn faculty_menu(role: Role) -> Vec<MenuItem> {
        FACULTY_MENU
            .iter()
            .filter(|entry| !entry.admin_only || role == Role::Admin)
            .map(|entry| MenuItem {
                title: entry.title.to_string(),
                icon: entry.icon.to_string(),
                color: entry.color.to_string(),
                path: entry.path.to_string(),
                description: entry.description.to_string(),
                admin_only: entry.admin_only,
            })
            .collect()
    }
}
