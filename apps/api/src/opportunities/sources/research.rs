use crate::opportunities::models::{deadline_on, Category, Compensation, Opportunity};

pub fn catalog(source: &str) -> Vec<Opportunity> {
    vec![
        Opportunity::new(
            "Undergraduate Research Assistant",
            "Support protein-folding experiments: prepare samples, run assays and keep the lab notebook current.",
            "Molecular Biology Lab",
            Category::Research,
            source,
        )
        .located("Boston, MA")
        .compensated(Compensation::Paid)
        .requirements(&["Sophomore standing or above", "Completed intro chemistry"])
        .skills(&["Pipetting", "Data entry", "Lab safety"])
        .tags(&["biology", "wet-lab", "undergraduate"])
        .apply_at("https://research.example.edu/molbio/assistant")
        .deadline(deadline_on(2026, 12, 1))
        .hours(12)
        .lasting("Spring semester"),
        Opportunity::new(
            "Machine Learning Research Intern",
            "Evaluate graph neural network baselines and reproduce published benchmark results.",
            "Applied AI Group",
            Category::Research,
            source,
        )
        .remote()
        .compensated(Compensation::Stipend)
        .requirements(&["Linear algebra", "One Python ML framework"])
        .skills(&["Python", "PyTorch", "Experiment tracking"])
        .tags(&["machine-learning", "remote"])
        .apply_at("https://research.example.edu/ai/intern")
        .contact("ai-group@example.edu")
        .deadline(deadline_on(2026, 11, 15))
        .hours(20)
        .lasting("10 weeks"),
        Opportunity::new(
            "Field Data Collector",
            "Collect water-quality samples along the river basin and log readings in the shared dataset.",
            "Environmental Science Institute",
            Category::Research,
            source,
        )
        .located("Portland, OR")
        .compensated(Compensation::AcademicCredit)
        .requirements(&["Valid driver's license"])
        .skills(&["Sampling", "GPS logging"])
        .tags(&["environment", "fieldwork"])
        .contact("fieldwork@esi.example.org")
        .hours(8)
        .lasting("Summer"),
        Opportunity::new(
            "Survey Design Assistant",
            "Draft and pilot survey instruments for a longitudinal study on first-generation students.",
            "Social Policy Research Center",
            Category::Research,
            source,
        )
        .remote()
        .compensated(Compensation::Unpaid)
        .skills(&["Qualtrics", "Questionnaire design"])
        .tags(&["social-science", "education"])
        .apply_at("https://sprc.example.org/join")
        .hours(6)
        .lasting("One semester"),
    ]
}
