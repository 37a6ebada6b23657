mod test_holywell_house;
