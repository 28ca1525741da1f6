use crate::opportunities::models::{deadline_on, Category, Compensation, Opportunity};

pub fn catalog(source: &str) -> Vec<Opportunity> {
    vec![
        Opportunity::new(
            "Frontend Engineering Intern",
            "Build React components for the onboarding flow and write tests alongside the product team.",
            "LaunchPad Labs",
            Category::Startup,
            source,
        )
        .located("San Francisco, CA")
        .compensated(Compensation::Paid)
        .requirements(&["Portfolio or GitHub profile"])
        .skills(&["TypeScript", "React", "CSS"])
        .tags(&["engineering", "frontend"])
        .apply_at("https://launchpad.example.com/careers/frontend-intern")
        .deadline(deadline_on(2027, 1, 10))
        .hours(40)
        .lasting("12 weeks"),
        Opportunity::new(
            "Growth Marketing Associate",
            "Run acquisition experiments across social channels and report weekly on funnel metrics.",
            "Brightside Health",
            Category::Startup,
            source,
        )
        .remote()
        .compensated(Compensation::Stipend)
        .skills(&["Copywriting", "Analytics", "A/B testing"])
        .tags(&["marketing", "remote"])
        .apply_at("https://brightside.example.com/jobs/growth")
        .hours(15)
        .lasting("3 months"),
        Opportunity::new(
            "Data Analyst Intern",
            "Clean transaction data, build dashboards and help the founders answer pricing questions.",
            "Ledgerly",
            Category::Startup,
            source,
        )
        .located("New York, NY")
        .compensated(Compensation::Paid)
        .requirements(&["Statistics coursework"])
        .skills(&["SQL", "Python", "Dashboards"])
        .tags(&["data", "fintech"])
        .apply_at("https://ledgerly.example.com/interns")
        .contact("hiring@ledgerly.example.com")
        .hours(30)
        .lasting("Summer"),
        Opportunity::new(
            "Product Design Fellow",
            "Prototype and usability-test a mobile check-in experience for community clinics.",
            "CareLoop",
            Category::Startup,
            source,
        )
        .located("Austin, TX")
        .compensated(Compensation::Unspecified)
        .skills(&["Figma", "User research"])
        .tags(&["design", "healthtech"])
        .contact("design@careloop.example.com")
        .lasting("6 months"),
    ]
}
