/// Countries with Burger King franchises, queried when no region list is configured.
pub const DEFAULT_REGIONS: &[&str] = &[
    "Argentina", "Aruba", "Australia", "Austria", "Belgium", "Bolivia", "Brazil", "Bulgaria",
    "Canada", "Chile", "China", "Colombia", "Costa Rica", "Croatia", "Czech Republic", "Denmark",
    "Dominican Republic", "Ecuador", "El Salvador", "Estonia", "Finland", "France", "Germany",
    "Greece", "Guatemala", "Honduras", "Hong Kong", "Hungary", "India", "Indonesia", "Ireland",
    "Israel", "Italy", "Japan", "Kuwait", "Latvia", "Lebanon", "Lithuania", "Luxembourg",
    "Malaysia", "Malta", "Mexico", "Netherlands", "New Zealand", "Nicaragua", "Norway", "Panama",
    "Paraguay", "Peru", "Philippines", "Poland", "Portugal", "Puerto Rico", "Qatar", "Romania",
    "Russia", "Saudi Arabia", "Singapore", "Slovakia", "Slovenia", "South Africa", "South Korea",
    "Spain", "Sweden", "Switzerland", "Taiwan", "Thailand", "Trinidad and Tobago", "Turkey",
    "Ukraine", "United Arab Emirates", "United Kingdom", "United States", "Uruguay", "Venezuela",
    "Vietnam",
];
