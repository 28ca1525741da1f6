use crate::opportunities::models::{deadline_on, Category, Compensation, Opportunity};

pub fn catalog(source: &str) -> Vec<Opportunity> {
    vec![
        Opportunity::new(
            "Virtual Literacy Tutor",
            "Tutor elementary students in reading twice a week over video calls.",
            "ReadAhead Foundation",
            Category::Nonprofit,
            source,
        )
        .remote()
        .compensated(Compensation::Unpaid)
        .requirements(&["Background check"])
        .skills(&["Patience", "Reading instruction"])
        .tags(&["education", "volunteer", "remote"])
        .apply_at("https://readahead.example.org/volunteer")
        .hours(3)
        .lasting("Ongoing"),
        Opportunity::new(
            "Grant Writing Volunteer",
            "Research foundation grants and draft proposals for the food bank's expansion program.",
            "Community Food Network",
            Category::Nonprofit,
            source,
        )
        .remote()
        .compensated(Compensation::Unpaid)
        .skills(&["Writing", "Research"])
        .tags(&["writing", "food-security"])
        .contact("volunteer@cfn.example.org")
        .deadline(deadline_on(2026, 12, 15))
        .hours(5)
        .lasting("3 months"),
        Opportunity::new(
            "Community Outreach Coordinator",
            "Organize neighborhood events and coordinate volunteers for the housing assistance program.",
            "Open Doors Housing",
            Category::Nonprofit,
            source,
        )
        .located("Chicago, IL")
        .compensated(Compensation::Stipend)
        .requirements(&["Bilingual English/Spanish preferred"])
        .skills(&["Event planning", "Communication"])
        .tags(&["housing", "outreach"])
        .apply_at("https://opendoors.example.org/coordinator")
        .hours(10)
        .lasting("Academic year"),
        Opportunity::new(
            "Conservation Field Intern",
            "Assist with trail restoration and invasive species removal across state parks.",
            "Green Trails Alliance",
            Category::Nonprofit,
            source,
        )
        .located("Denver, CO")
        .compensated(Compensation::AcademicCredit)
        .skills(&["Outdoor work", "Teamwork"])
        .tags(&["environment", "outdoors"])
        .apply_at("https://greentrails.example.org/intern")
        .hours(25)
        .lasting("Summer"),
    ]
}
