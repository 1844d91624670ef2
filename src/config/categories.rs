//! Built-in default category mappings.
//!
//! Maps the aggregator's detailed personal-finance categories onto a small set of
//! user-facing categories. Used by "seed defaults" when `config.toml` does not
//! provide its own `[[categories]]` list.

use super::settings::CategorySeed;

/// `(custom_category, subcategory)` pairs seeded for a new user.
pub const DEFAULT_CATEGORY_MAPPINGS: &[(&str, &str)] = &[
    ("Income", "INCOME_DIVIDENDS"),
    ("Income", "INCOME_INTEREST_EARNED"),
    ("Income", "INCOME_RETIREMENT_PENSION"),
    ("Income", "INCOME_TAX_REFUND"),
    ("Income", "INCOME_UNEMPLOYMENT"),
    ("Income", "INCOME_WAGES"),
    ("Income", "INCOME_OTHER_INCOME"),
    ("Transfer In", "TRANSFER_IN_CASH_ADVANCES_AND_LOANS"),
    ("Transfer In", "TRANSFER_IN_DEPOSIT"),
    ("Transfer In", "TRANSFER_IN_INVESTMENT_AND_RETIREMENT_FUNDS"),
    ("Transfer In", "TRANSFER_IN_SAVINGS"),
    ("Transfer In", "TRANSFER_IN_ACCOUNT_TRANSFER"),
    ("Transfer In", "TRANSFER_IN_OTHER_TRANSFER_IN"),
    ("Transfer Out", "TRANSFER_OUT_INVESTMENT_AND_RETIREMENT_FUNDS"),
    ("Transfer Out", "TRANSFER_OUT_SAVINGS"),
    ("Transfer Out", "TRANSFER_OUT_WITHDRAWAL"),
    ("Transfer Out", "TRANSFER_OUT_ACCOUNT_TRANSFER"),
    ("Transfer Out", "TRANSFER_OUT_OTHER_TRANSFER_OUT"),
    ("Loan Payments", "LOAN_PAYMENTS_CAR_PAYMENT"),
    ("Loan Payments", "LOAN_PAYMENTS_CREDIT_CARD_PAYMENT"),
    ("Loan Payments", "LOAN_PAYMENTS_PERSONAL_LOAN_PAYMENT"),
    ("Loan Payments", "LOAN_PAYMENTS_MORTGAGE_PAYMENT"),
    ("Loan Payments", "LOAN_PAYMENTS_STUDENT_LOAN_PAYMENT"),
    ("Loan Payments", "LOAN_PAYMENTS_OTHER_PAYMENT"),
    ("Bank Fees", "BANK_FEES_ATM_FEES"),
    ("Bank Fees", "BANK_FEES_FOREIGN_TRANSACTION_FEES"),
    ("Bank Fees", "BANK_FEES_INSUFFICIENT_FUNDS"),
    ("Bank Fees", "BANK_FEES_INTEREST_CHARGE"),
    ("Bank Fees", "BANK_FEES_OVERDRAFT_FEES"),
    ("Bank Fees", "BANK_FEES_OTHER_BANK_FEES"),
    ("Entertainment", "ENTERTAINMENT_CASINOS_AND_GAMBLING"),
    ("Entertainment", "ENTERTAINMENT_MUSIC_AND_AUDIO"),
    ("Entertainment", "ENTERTAINMENT_SPORTING_EVENTS_AMUSEMENT_PARKS_AND_MUSEUMS"),
    ("Entertainment", "ENTERTAINMENT_TV_AND_MOVIES"),
    ("Entertainment", "ENTERTAINMENT_VIDEO_GAMES"),
    ("Entertainment", "ENTERTAINMENT_OTHER_ENTERTAINMENT"),
    ("Food and Drink", "FOOD_AND_DRINK_BEER_WINE_AND_LIQUOR"),
    ("Food and Drink", "FOOD_AND_DRINK_COFFEE"),
    ("Food and Drink", "FOOD_AND_DRINK_FAST_FOOD"),
    ("Food and Drink", "FOOD_AND_DRINK_GROCERIES"),
    ("Food and Drink", "FOOD_AND_DRINK_RESTAURANT"),
    ("Food and Drink", "FOOD_AND_DRINK_VENDING_MACHINES"),
    ("Food and Drink", "FOOD_AND_DRINK_OTHER_FOOD_AND_DRINK"),
    ("General Merchandise", "GENERAL_MERCHANDISE_BOOKSTORES_AND_NEWSSTANDS"),
    ("General Merchandise", "GENERAL_MERCHANDISE_CLOTHING_AND_ACCESSORIES"),
    ("General Merchandise", "GENERAL_MERCHANDISE_CONVENIENCE_STORES"),
    ("General Merchandise", "GENERAL_MERCHANDISE_DEPARTMENT_STORES"),
    ("General Merchandise", "GENERAL_MERCHANDISE_DISCOUNT_STORES"),
    ("General Merchandise", "GENERAL_MERCHANDISE_ELECTRONICS"),
    ("General Merchandise", "GENERAL_MERCHANDISE_GIFTS_AND_NOVELTIES"),
    ("General Merchandise", "GENERAL_MERCHANDISE_OFFICE_SUPPLIES"),
    ("General Merchandise", "GENERAL_MERCHANDISE_ONLINE_MARKETPLACES"),
    ("General Merchandise", "GENERAL_MERCHANDISE_PET_SUPPLIES"),
    ("General Merchandise", "GENERAL_MERCHANDISE_SPORTING_GOODS"),
    ("General Merchandise", "GENERAL_MERCHANDISE_SUPERSTORES"),
    ("General Merchandise", "GENERAL_MERCHANDISE_TOBACCO_AND_VAPE"),
    ("General Merchandise", "GENERAL_MERCHANDISE_OTHER_GENERAL_MERCHANDISE"),
    ("Home Improvement", "HOME_IMPROVEMENT_FURNITURE"),
    ("Home Improvement", "HOME_IMPROVEMENT_HARDWARE"),
    ("Home Improvement", "HOME_IMPROVEMENT_REPAIR_AND_MAINTENANCE"),
    ("Home Improvement", "HOME_IMPROVEMENT_SECURITY"),
    ("Home Improvement", "HOME_IMPROVEMENT_OTHER_HOME_IMPROVEMENT"),
    ("Medical", "MEDICAL_DENTAL_CARE"),
    ("Medical", "MEDICAL_EYE_CARE"),
    ("Medical", "MEDICAL_NURSING_CARE"),
    ("Medical", "MEDICAL_PHARMACIES_AND_SUPPLEMENTS"),
    ("Medical", "MEDICAL_PRIMARY_CARE"),
    ("Medical", "MEDICAL_VETERINARY_SERVICES"),
    ("Medical", "MEDICAL_OTHER_MEDICAL"),
    ("Personal Care", "PERSONAL_CARE_GYMS_AND_FITNESS_CENTERS"),
    ("Personal Care", "PERSONAL_CARE_HAIR_AND_BEAUTY"),
    ("Personal Care", "PERSONAL_CARE_LAUNDRY_AND_DRY_CLEANING"),
    ("Personal Care", "PERSONAL_CARE_OTHER_PERSONAL_CARE"),
    ("General Services", "GENERAL_SERVICES_ACCOUNTING_AND_FINANCIAL_PLANNING"),
    ("General Services", "GENERAL_SERVICES_AUTOMOTIVE"),
    ("General Services", "GENERAL_SERVICES_CHILDCARE"),
    ("General Services", "GENERAL_SERVICES_CONSULTING_AND_LEGAL"),
    ("General Services", "GENERAL_SERVICES_EDUCATION"),
    ("General Services", "GENERAL_SERVICES_INSURANCE"),
    ("General Services", "GENERAL_SERVICES_POSTAGE_AND_SHIPPING"),
    ("General Services", "GENERAL_SERVICES_STORAGE"),
    ("General Services", "GENERAL_SERVICES_OTHER_GENERAL_SERVICES"),
    ("Government and Non-Profit", "GOVERNMENT_AND_NON_PROFIT_DONATIONS"),
    ("Government and Non-Profit", "GOVERNMENT_AND_NON_PROFIT_GOVERNMENT_DEPARTMENTS_AND_AGENCIES"),
    ("Government and Non-Profit", "GOVERNMENT_AND_NON_PROFIT_TAX_PAYMENT"),
    ("Government and Non-Profit", "GOVERNMENT_AND_NON_PROFIT_OTHER_GOVERNMENT_AND_NON_PROFIT"),
    ("Transportation", "TRANSPORTATION_BIKES_AND_SCOOTERS"),
    ("Transportation", "TRANSPORTATION_GAS"),
    ("Transportation", "TRANSPORTATION_PARKING"),
    ("Transportation", "TRANSPORTATION_PUBLIC_TRANSIT"),
    ("Transportation", "TRANSPORTATION_TAXIS_AND_RIDE_SHARES"),
    ("Transportation", "TRANSPORTATION_TOLLS"),
    ("Transportation", "TRANSPORTATION_OTHER_TRANSPORTATION"),
    ("Travel", "TRAVEL_FLIGHTS"),
    ("Travel", "TRAVEL_LODGING"),
    ("Travel", "TRAVEL_RENTAL_CARS"),
    ("Travel", "TRAVEL_OTHER_TRAVEL"),
    ("Rent and Utilities", "RENT_AND_UTILITIES_GAS_AND_ELECTRICITY"),
    ("Rent and Utilities", "RENT_AND_UTILITIES_INTERNET_AND_CABLE"),
    ("Rent and Utilities", "RENT_AND_UTILITIES_RENT"),
    ("Rent and Utilities", "RENT_AND_UTILITIES_SEWAGE_AND_WASTE_MANAGEMENT"),
    ("Rent and Utilities", "RENT_AND_UTILITIES_TELEPHONE"),
    ("Rent and Utilities", "RENT_AND_UTILITIES_WATER"),
    ("Rent and Utilities", "RENT_AND_UTILITIES_OTHER_UTILITIES"),
    ("Food and Drink", "FOOD_AND_DRINK_OTHER"),
    ("Transportation", "TRANSPORTATION_OTHER"),
    ("Entertainment", "ENTERTAINMENT_OTHER"),
    ("General Merchandise", "GENERAL_MERCHANDISE_OTHER"),
    ("General Services", "GENERAL_SERVICES_OTHER"),
    ("Medical", "MEDICAL_OTHER"),
    ("Personal Care", "PERSONAL_CARE_OTHER"),
    ("Home Improvement", "HOME_IMPROVEMENT_OTHER"),
    ("Bank Fees", "BANK_FEES_OTHER"),
    ("Loan Payments", "LOAN_PAYMENTS_OTHER"),
    ("Transfer In", "TRANSFER_IN_OTHER"),
    ("Transfer Out", "TRANSFER_OUT_OTHER"),
    ("Income", "INCOME_OTHER"),
    ("Government and Non-Profit", "GOVERNMENT_AND_NON_PROFIT_OTHER"),
    ("Travel", "TRAVEL_OTHER"),
    ("Rent and Utilities", "RENT_AND_UTILITIES_OTHER"),
    ("Other", "OTHER"),
    ("Other", "UNCATEGORIZED"),
    ("Other", "UNKNOWN"),
];

/// The built-in mappings as owned seeds.
#[must_use]
pub fn default_category_seeds() -> Vec<CategorySeed> {
    DEFAULT_CATEGORY_MAPPINGS
        .iter()
        .map(|(category, subcategory)| CategorySeed {
            category: (*category).to_string(),
            subcategory: (*subcategory).to_string(),
        })
        .collect()
}
