use crate::opportunities::models::{Category, Compensation, Opportunity};

pub fn catalog(source: &str) -> Vec<Opportunity> {
    vec![
        Opportunity::new(
            "Hackathon Organizing Committee",
            "Plan the annual 36-hour hackathon: sponsors, logistics, judging and mentor scheduling.",
            "Computer Science Society",
            Category::StudentOrg,
            source,
        )
        .located("Campus")
        .compensated(Compensation::Unpaid)
        .skills(&["Event planning", "Sponsorship outreach"])
        .tags(&["leadership", "tech"])
        .contact("board@css.example.edu")
        .hours(4)
        .lasting("Academic year"),
        Opportunity::new(
            "Peer Mentor",
            "Guide first-year students through course selection and campus resources.",
            "First-Gen Student Alliance",
            Category::StudentOrg,
            source,
        )
        .located("Campus")
        .compensated(Compensation::AcademicCredit)
        .requirements(&["Junior or senior standing"])
        .skills(&["Mentoring", "Active listening"])
        .tags(&["mentoring", "community"])
        .apply_at("https://fgsa.example.edu/mentors")
        .hours(2)
        .lasting("One semester"),
        // Cross-posted by the lab through the campus board; the research feed's
        // copy is registered first and wins deduplication.
        Opportunity::new(
            "Undergraduate Research Assistant",
            "Campus listing for the molecular biology lab assistant role.",
            "Molecular Biology Lab",
            Category::StudentOrg,
            source,
        )
        .located("Campus")
        .compensated(Compensation::Paid)
        .tags(&["biology", "cross-posted"])
        .contact("molbio@example.edu")
        .hours(12)
        .lasting("Spring semester"),
    ]
}
